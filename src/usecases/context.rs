use crate::{
    domain::catalog::Catalog,
    infra::{config::AppConfig, storage_layout::StorageLayout},
};

#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub storage: StorageLayout,
}

impl AppContext {
    pub fn new(config: AppConfig, catalog: Catalog, storage: StorageLayout) -> Self {
        Self {
            config,
            catalog,
            storage,
        }
    }
}
