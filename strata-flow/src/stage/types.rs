use std::future::Future;
use std::pin::Pin;

use crate::error::StageError;

// For stage transform results
pub type StageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StageError>> + Send + 'a>>;
