#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use rp_document as document;
pub use rp_represent as represent;
pub use rp_utils as utils;
