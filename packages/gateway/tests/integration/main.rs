mod common;
mod health;
mod upload;
