//! Hostname resolution through `hickory-resolver`.

use std::sync::Arc;

use futures::future::BoxFuture;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::RData;
use hickory_resolver::TokioAsyncResolver;

use super::{HostResolution, HostResolver};
use crate::error_handling::DnsError;

/// `HostResolver` backed by a shared hickory resolver.
#[derive(Clone)]
pub struct HickoryHostResolver {
    resolver: Arc<TokioAsyncResolver>,
}

impl HickoryHostResolver {
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        HickoryHostResolver { resolver }
    }

    async fn lookup(&self, host: &str) -> Result<HostResolution, DnsError> {
        match self.resolver.lookup_ip(host).await {
            Ok(lookup) => {
                let mut cnames: Vec<String> = Vec::new();
                for record in lookup.as_lookup().records() {
                    if let Some(RData::CNAME(cname)) = record.data() {
                        let name = cname.0.to_utf8().trim_end_matches('.').to_string();
                        if !cnames.contains(&name) {
                            cnames.push(name);
                        }
                    }
                }
                let mut ips = Vec::new();
                for ip in lookup.iter() {
                    if !ips.contains(&ip) {
                        ips.push(ip);
                    }
                }
                Ok(HostResolution { cnames, ips })
            }
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => {
                    log::debug!("No address records for {host}");
                    Ok(HostResolution::default())
                }
                _ => Err(DnsError::Lookup {
                    host: host.to_string(),
                    message: e.to_string(),
                }),
            },
        }
    }
}

impl HostResolver for HickoryHostResolver {
    fn resolve<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<HostResolution, DnsError>> {
        Box::pin(self.lookup(host))
    }
}
