use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid menu item: {0}")]
    InvalidItem(String),
}
