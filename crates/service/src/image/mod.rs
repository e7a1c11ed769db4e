//! Product images. Metadata lives in the relational store, payloads in the blob store;
//! writes and deletes keep the two in step (see [`service::ImageService`]).

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ImageService;
