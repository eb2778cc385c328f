#![allow(dead_code)] // Each test binary uses a different subset

use std::cell::RefCell;
use std::collections::HashMap;

use heirloom_core::{AssetDescriptor, Catalog, FetchError, Fetcher, Metadata};

/// How the scripted fetcher answers one URL.
#[derive(Clone)]
pub enum Reply {
    Body(Vec<u8>),
    Timeout,
    Status(u16),
}

/// In-memory fetcher with canned replies that records every request.
///
/// Unscripted URLs answer with their own bytes.
#[derive(Default)]
pub struct ScriptedFetcher {
    replies: HashMap<String, Reply>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        match self.replies.get(url) {
            Some(Reply::Body(bytes)) => Ok(bytes.clone()),
            Some(Reply::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            Some(Reply::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Ok(url.as_bytes().to_vec()),
        }
    }
}

pub fn url_for(id: &str) -> String {
    format!("https://archive.test/{id}.jpg")
}

pub fn asset(id: &str, asset_type: &str, target_path: &str) -> AssetDescriptor {
    AssetDescriptor {
        id: id.to_string(),
        name: format!("Asset {id}"),
        url: url_for(id),
        description: format!("Test asset {id}"),
        source_org: "Test Archive".to_string(),
        asset_type: asset_type.to_string(),
        target_path: target_path.to_string(),
        metadata: Metadata::new(),
    }
}

/// The two-asset catalog `a -> x/a.jpg`, `b -> x/b.jpg`.
pub fn catalog_ab() -> Catalog {
    Catalog::from_assets(vec![asset("a", "map", "x/a.jpg"), asset("b", "map", "x/b.jpg")]).unwrap()
}
