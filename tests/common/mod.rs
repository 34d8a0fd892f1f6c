#![allow(dead_code)]

pub mod mock_relay;

pub use mock_relay::{
    spawn_raw_relay, spawn_relay, DownloadScript, MockRelay, UploadScript, UploadedFile,
};
