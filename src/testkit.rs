//! Test tooling for crates that index into Solr.
//!
//! [`TestCore`] gives downstream test suites a disposable core: it creates
//! a core named after [`SolrConfig::test_collection`], optionally syncs a
//! schema into it, and unloads the core again when dropped. Requires a
//! running Solr to talk to.
//!
//! # Example
//!
//! ```rust,no_run
//! use solr_kit::testkit::TestCore;
//! use solr_kit::{SolrConfig, SolrQuerySet};
//!
//! # fn main() -> Result<(), solr_kit::SolrError> {
//! let config = SolrConfig {
//!     url: "http://localhost:8983/solr".into(),
//!     collection: "myproj".into(),
//!     ..Default::default()
//! };
//!
//! let core = TestCore::create(&config, None)?;
//! let count = SolrQuerySet::new(core.client()).count()?;
//! assert_eq!(count, 0);
//! // core is unloaded when `core` goes out of scope
//! # Ok(())
//! # }
//! ```

use tracing::{info, warn};

use crate::client::SolrClient;
use crate::config::SolrConfig;
use crate::error::SolrError;
use crate::schema::SchemaConfig;

/// A disposable Solr core for tests, unloaded on drop.
pub struct TestCore {
    client: SolrClient,
    name: String,
}

impl TestCore {
    /// Create the test core and, when a schema is given, sync it in.
    ///
    /// The core name comes from [`SolrConfig::test_collection`]; the
    /// configured config set is used for creation.
    pub fn create(config: &SolrConfig, schema: Option<&SchemaConfig>) -> Result<Self, SolrError> {
        let name = config.test_collection();
        let test_config = SolrConfig {
            collection: name.clone(),
            ..config.clone()
        };
        info!("Configuring test Solr core {}", name);

        let client = SolrClient::new(test_config)?;
        if !client.core_admin.ping(&name)? {
            let config_set = client.config().config_set.clone();
            client.core_admin.create(&name, Some(&config_set))?;
        }

        if let Some(schema) = schema {
            schema.configure_field_types(&client)?;
            schema.configure_fields(&client)?;
            client.core_admin.reload(&name)?;
        }

        Ok(Self { client, name })
    }

    /// Client connected to the test core.
    pub fn client(&self) -> &SolrClient {
        &self.client
    }

    /// Name of the test core.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TestCore {
    fn drop(&mut self) {
        // best effort; a failed unload should not panic a test run
        if let Err(err) = self.client.core_admin.unload(&self.name) {
            warn!("Failed to unload test core {}: {}", self.name, err);
        }
    }
}
