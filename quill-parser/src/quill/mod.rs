//! Main module for quill library functionality

pub mod ast;
pub mod engine;
pub mod formats;
pub mod indentation;
pub mod lexing;
pub mod lines;
pub mod markup;
pub mod rainbow;
pub mod reading;
pub mod rendering;
pub mod tagging;
pub mod testing;
