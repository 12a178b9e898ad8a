use std::{path::Path, sync::Arc};

use crate::{
    domain::catalog::Catalog,
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter},
        contracts::ConfigAdapter,
        counter_store::JsonCounterStore,
        error::AppError,
        logging::LoggingGuard,
        storage_layout::StorageLayout,
    },
    usecases::{
        context::AppContext,
        orders::{OrderCommandProcessor, OrderPolicy},
    },
};

pub type AppProcessor = OrderCommandProcessor<Arc<JsonCounterStore>>;

/// Loads config, resolves storage and installs logging.
pub fn bootstrap(config_path: Option<&Path>) -> anyhow::Result<(AppContext, LoggingGuard)> {
    let context = build_context(config_path)?;
    let logging = infra::logging::init(&context.config.logging)?;

    tracing::debug!(
        export_dir = %context.storage.export_dir.display(),
        products = context.catalog.list().len(),
        "order counter bootstrapped"
    );

    Ok((context, logging))
}

pub fn compose_processor(context: &AppContext) -> AppProcessor {
    let store = Arc::new(JsonCounterStore::new(context.storage.data_file.clone()));
    tracing::debug!(
        path = %store.path().display(),
        require_reply = context.config.orders.require_reply,
        "order store ready"
    );

    OrderCommandProcessor::new(context.catalog.clone(), store).with_policy(OrderPolicy {
        require_reply: context.config.orders.require_reply,
    })
}

fn build_context(config_path: Option<&Path>) -> anyhow::Result<AppContext> {
    context_from(&FileConfigAdapter::new(config_path))
}

fn context_from(adapter: &impl ConfigAdapter) -> anyhow::Result<AppContext> {
    let config = adapter.load()?;
    let catalog = catalog_from(&config)?;
    let storage = StorageLayout::resolve(&config.storage)?;
    storage.ensure_dirs()?;

    Ok(AppContext::new(config, catalog, storage))
}

fn catalog_from(config: &AppConfig) -> Result<Catalog, AppError> {
    match &config.orders.products {
        Some(products) => Ok(Catalog::new(products)?),
        None => Ok(Catalog::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{
        domain::catalog::CatalogError,
        domain::{events::BotCommand, events::CommandRequest, reply::CommandReply},
        infra::stubs::StubConfigAdapter,
    };

    fn write_config(dir: &TempDir, extra: &str) -> std::path::PathBuf {
        let config_path = dir.path().join("config.toml");
        let data = dir.path().join("data").join("order_counts.json");
        let exports = dir.path().join("exports");
        fs::write(
            &config_path,
            format!(
                "[storage]\ndata_file = {:?}\nexport_dir = {:?}\n{extra}",
                data.to_string_lossy(),
                exports.to_string_lossy()
            ),
        )
        .expect("config should be writable");
        config_path
    }

    #[test]
    fn builds_context_with_configured_storage_and_default_catalog() {
        let dir = TempDir::new().expect("temp dir");
        let config_path = write_config(&dir, "");

        let context = build_context(Some(&config_path)).expect("context should build");

        assert_eq!(context.catalog, Catalog::default());
        assert!(dir.path().join("data").is_dir());
        assert!(context.storage.export_dir.is_dir());
    }

    #[test]
    fn builds_context_from_adapter_supplied_config() {
        let dir = TempDir::new().expect("temp dir");
        let mut config = AppConfig::default();
        config.storage.data_file = Some(dir.path().join("store").join("counts.json"));
        config.storage.export_dir = Some(dir.path().join("out"));
        config.orders.products = Some(vec!["Tea".to_owned(), "Coffee".to_owned()]);

        let context =
            context_from(&StubConfigAdapter { config }).expect("context should build");

        let names: Vec<&str> = context.catalog.list().iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["Tea", "Coffee"]);
        assert_eq!(
            context.storage.data_file,
            dir.path().join("store").join("counts.json")
        );
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn rejects_configured_catalog_with_duplicates() {
        let dir = TempDir::new().expect("temp dir");
        let config_path = write_config(&dir, "[orders]\nproducts = [\"Tea\", \"TEA\"]\n");

        let err = build_context(Some(&config_path)).expect_err("duplicate catalog must fail");

        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::CatalogConfig(CatalogError::Duplicate { .. }))
        ));
    }

    #[test]
    fn composed_processor_persists_to_configured_data_file() {
        let dir = TempDir::new().expect("temp dir");
        let config_path = write_config(
            &dir,
            "[orders]\nproducts = [\"Tea\", \"Coffee\"]\nrequire_reply = true\n",
        );
        let context = build_context(Some(&config_path)).expect("context should build");
        let processor = compose_processor(&context);

        let reply = processor.handle(
            &CommandRequest::new(
                "7",
                "Chat 7",
                BotCommand::RecordOrder {
                    product_text: "coffee".to_owned(),
                },
            )
            .replying(),
        );

        assert_eq!(
            reply,
            CommandReply::text("✅ Order counted for Coffee (total: 1)")
        );
        assert!(context.storage.data_file.exists());
    }
}
