//! Input processing module
//! Handles uploaded files and text extraction

pub mod pdf_service;
