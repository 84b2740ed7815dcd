use std::{iter::FusedIterator, marker::PhantomData};

use log::trace;
use serde::de::DeserializeOwned;

use crate::{
    error::{ServiceCallError, ServiceFault, translate},
    protocol::RowCursor,
};

/// Lazy sequence of typed records read from a query cursor.
///
/// Each row is deserialized when it is pulled. The cursor and its query context are released
/// as soon as the sequence is exhausted, a row fails, or the sequence is dropped; after a
/// failure the sequence yields nothing more.
pub struct Records<T> {
    cursor: Option<Box<dyn RowCursor>>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Records<T> {
    pub(crate) fn new(cursor: Box<dyn RowCursor>) -> Self {
        Self {
            cursor: Some(cursor),
            _record: PhantomData,
        }
    }

    /// Returns true once the underlying cursor has been released.
    pub fn is_released(&self) -> bool {
        self.cursor.is_none()
    }

    fn release(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            trace!("releasing query cursor");
            cursor.close();
        }
    }

    fn fail(&mut self, fault: ServiceFault) -> Option<Result<T, ServiceCallError>> {
        self.release();
        Some(Err(translate(fault)))
    }
}

impl<T: DeserializeOwned> Iterator for Records<T> {
    type Item = Result<T, ServiceCallError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;

        match cursor.next_row() {
            Some(Ok(row)) => match serde_json::from_value(row) {
                Ok(record) => Some(Ok(record)),
                Err(e) => self.fail(ServiceFault::other(e)),
            },
            Some(Err(fault)) => self.fail(fault),
            None => {
                self.release();
                None
            }
        }
    }
}

impl<T: DeserializeOwned> FusedIterator for Records<T> {}

impl<T> Drop for Records<T> {
    fn drop(&mut self) {
        self.release();
    }
}
