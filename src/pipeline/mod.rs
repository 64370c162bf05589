//! Per-target enrichment pipeline.
//!
//! One target goes through: fetch -> base facts -> passive DNS/ASN -> CDN
//! classification -> body rule scan, each stage only when requested. At most
//! one HTTP fetch happens per target and its response is shared by every
//! stage that needs it. Failures never escape: they become a
//! `TargetOutcome::Skipped` with the reason.

use std::net::IpAddr;
use std::sync::Arc;

use crate::asn::{first_asn_record, AsnLookup};
use crate::cdn::{classify, CdnSignals, CdnTables};
use crate::dns::{HostResolution, HostResolver};
use crate::domain::extract_host;
use crate::error_handling::{update_error_stats, ErrorType, ProcessingStats, SkipReason};
use crate::fetch::{base_info, FetchedResponse, Fetcher};
use crate::models::{BaseInfo, PassiveInfo, ScanResult, TargetOutcome, VulnerabilityInfo};
use crate::rules::RuleSet;

/// Which enrichment stages run for each target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentFlags {
    pub base: bool,
    pub passive: bool,
    pub may_vul: bool,
}

impl Default for EnrichmentFlags {
    fn default() -> Self {
        EnrichmentFlags {
            base: true,
            passive: false,
            may_vul: false,
        }
    }
}

/// Shared providers and reference data used by every pipeline run.
#[derive(Clone)]
pub struct EnrichmentContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub resolver: Arc<dyn HostResolver>,
    pub asn: Arc<dyn AsnLookup>,
    pub cdn_tables: Arc<CdnTables>,
    pub rules: Arc<RuleSet>,
    pub stats: Arc<ProcessingStats>,
}

/// Runs the requested stages for `url` and returns what the sink should see.
pub async fn enrich_target(
    ctx: &EnrichmentContext,
    url: &str,
    flags: EnrichmentFlags,
) -> TargetOutcome {
    match run_stages(ctx, url, flags).await {
        Ok(result) => TargetOutcome::from_result(url, result),
        Err(skipped) => skipped,
    }
}

async fn run_stages(
    ctx: &EnrichmentContext,
    url: &str,
    flags: EnrichmentFlags,
) -> Result<ScanResult, TargetOutcome> {
    let mut response: Option<FetchedResponse> = None;

    let base_info = if flags.base {
        base_info(ensure_fetched(ctx, url, &mut response).await?)
    } else {
        BaseInfo::default()
    };

    let passive_info = if flags.passive {
        passive_stage(ctx, url, &mut response).await?
    } else {
        PassiveInfo::default()
    };

    let regex_info = if flags.may_vul {
        let resp = ensure_fetched(ctx, url, &mut response).await?;
        VulnerabilityInfo {
            may_vul: ctx.rules.scan(&resp.body_text()),
        }
    } else {
        VulnerabilityInfo::default()
    };

    Ok(ScanResult {
        base_info,
        passive_info,
        regex_info,
    })
}

/// Returns the target's response, fetching it on first use.
async fn ensure_fetched<'r>(
    ctx: &EnrichmentContext,
    url: &str,
    slot: &'r mut Option<FetchedResponse>,
) -> Result<&'r FetchedResponse, TargetOutcome> {
    let response = match slot.take() {
        Some(response) => response,
        None => ctx.fetcher.fetch(url).await.map_err(|e| {
            update_error_stats(&ctx.stats, &e);
            TargetOutcome::skipped(url, SkipReason::FetchFailed, e.to_string())
        })?,
    };
    Ok(slot.insert(response))
}

async fn passive_stage(
    ctx: &EnrichmentContext,
    url: &str,
    response: &mut Option<FetchedResponse>,
) -> Result<PassiveInfo, TargetOutcome> {
    let host = extract_host(url)
        .map_err(|e| TargetOutcome::skipped(url, SkipReason::InvalidUrl, format!("{e:#}")))?;

    let (dns, asn_ips) = tokio::join!(ctx.resolver.resolve(&host), ctx.asn.resolve_ips(&host));

    let resolution = dns.unwrap_or_else(|e| {
        log::debug!("{e}");
        ctx.stats.increment_error(ErrorType::DnsIpLookupError);
        HostResolution::default()
    });
    let asn_ips = asn_ips.unwrap_or_else(|e| {
        log::debug!("{e}");
        ctx.stats.increment_error(ErrorType::DnsIpLookupError);
        Vec::new()
    });

    let ips = union_ips(&resolution.ips, &asn_ips);
    if ips.is_empty() {
        return Err(TargetOutcome::skipped(
            url,
            SkipReason::Unresolved,
            format!("no address for {host}"),
        ));
    }

    let network = first_asn_record(ctx.asn.as_ref(), &ips).unwrap_or_default();
    let ip_strings: Vec<String> = ips.iter().map(IpAddr::to_string).collect();

    let resp = ensure_fetched(ctx, url, response).await?;
    let evidence = classify(
        CdnSignals {
            ips: &ip_strings,
            headers: &resp.headers,
            cidr: &network.cidr,
            asn: &network.asn,
            cnames: &resolution.cnames,
        },
        &ctx.cdn_tables,
    );

    Ok(PassiveInfo {
        cname: resolution.cnames,
        ip: ip_strings.join(","),
        cdn: evidence.verdict(),
        cdn_by_ip: evidence.by_ip,
        cdn_by_header: evidence.by_header,
        cdn_by_cidr: evidence.by_cidr,
        cdn_by_asn: evidence.by_asn,
        cdn_by_cname: evidence.by_cname,
        cidr: network.cidr,
        asn: network.asn,
        org: network.org,
        addr: network.country,
    })
}

/// DNS addresses first, then the ASN resolver's, without duplicates.
fn union_ips(first: &[IpAddr], second: &[IpAddr]) -> Vec<IpAddr> {
    let mut ips: Vec<IpAddr> = Vec::with_capacity(first.len() + second.len());
    for ip in first.iter().chain(second) {
        if !ips.contains(ip) {
            ips.push(*ip);
        }
    }
    ips
}
