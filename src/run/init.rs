//! Scan resource initialization.
//!
//! This module handles all setup before the main scan loop begins: the
//! evidence providers, the reference tables, and the throughput controls.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::asn::MaxMindAsn;
use crate::cdn::CdnTables;
use crate::config::Config;
use crate::dns::{load_resolver_list, HickoryHostResolver};
use crate::error_handling::ProcessingStats;
use crate::fetch::HttpFetcher;
use crate::initialization::{init_client, init_rate_limiter, init_resolver, init_semaphore};
use crate::pipeline::{EnrichmentContext, EnrichmentFlags};
use crate::rules::RuleSet;

use super::resources::ScanResources;

/// Builds the live providers and loads the reference tables for `config`.
///
/// Reference tables are only read for the stages that use them. A missing
/// or malformed table disables its check and never fails the run.
///
/// # Errors
///
/// Returns an error if the request configuration is invalid or the HTTP
/// client cannot be built.
pub fn build_enrichment_context(config: &Config) -> Result<EnrichmentContext> {
    let request_config = config
        .request_config()
        .context("Invalid request configuration")?;
    let client = init_client(&request_config).context("Failed to initialize HTTP client")?;
    let files = config.data_files();

    let nameservers = if config.passive {
        load_resolver_list(&files.resolvers)
    } else {
        Vec::new()
    };
    if !nameservers.is_empty() {
        info!("Using {} DNS resolvers from {}", nameservers.len(), files.resolvers.display());
    }
    let resolver = HickoryHostResolver::new(init_resolver(&nameservers));
    // The ASN provider resolves through the default upstream servers.
    let asn_resolver = HickoryHostResolver::new(init_resolver(&[]));
    let asn = MaxMindAsn::open(
        config.asn_db.as_deref(),
        config.country_db.as_deref(),
        asn_resolver,
    );
    if config.passive && !asn.is_enabled() {
        warn!("No MaxMind database loaded; cidr, asn, org and addr stay empty");
    }

    let cdn_tables = if config.passive {
        CdnTables::load(&files)
    } else {
        CdnTables::default()
    };
    let rules = if config.may_vul {
        match RuleSet::load(&files.may_vul_rules) {
            Ok(rules) if rules.is_empty() => {
                warn!(
                    "No usable rules in {}; vulnerability rule scan will find nothing",
                    files.may_vul_rules.display()
                );
                rules
            }
            Ok(rules) => {
                info!("Loaded {} vulnerability rules", rules.len());
                rules
            }
            Err(e) => {
                warn!("{e}. Vulnerability rule scan disabled.");
                RuleSet::default()
            }
        }
    } else {
        RuleSet::default()
    };

    Ok(EnrichmentContext {
        fetcher: Arc::new(HttpFetcher::new(client, &request_config)),
        resolver: Arc::new(resolver),
        asn: Arc::new(asn),
        cdn_tables: Arc::new(cdn_tables),
        rules: Arc::new(rules),
        stats: Arc::new(ProcessingStats::new()),
    })
}

/// Initialize the throughput controls around an enrichment context.
///
/// The rate limiter bucket holds one token, so dispatches are spaced by
/// exactly `1 / rate_limit` seconds.
pub fn init_scan_resources(config: &Config, ctx: EnrichmentContext) -> ScanResources {
    let flags = EnrichmentFlags {
        base: config.base,
        passive: config.passive,
        may_vul: config.may_vul,
    };
    if !(flags.base || flags.passive || flags.may_vul) {
        warn!("No enrichment stage enabled; every target will be skipped as empty");
    }

    let request_limiter = init_rate_limiter(config.rate_limit, 1);
    match &request_limiter {
        Some(limiter) => info!("Rate limit: {} targets/sec", limiter.rps()),
        None => info!("Rate limiting disabled"),
    }

    let stats = Arc::clone(&ctx.stats);
    ScanResources {
        ctx,
        flags,
        semaphore: init_semaphore(config.worker_count()),
        request_limiter,
        target_deadline: config.target_deadline(),
        stats,
        dispatched: Arc::new(AtomicUsize::new(0)),
        start_time: std::time::Instant::now(),
    }
}
