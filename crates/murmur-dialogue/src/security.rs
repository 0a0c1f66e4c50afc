//! Domain-list permission registry.
//!
//! Tracks trusted, blocked, and one-time-session domains. The blocklist
//! has the highest precedence, then the trusted list, then one-time
//! sessions; unknown domains come back as `Ask` so the coordinator can
//! run the security confirmation flow.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, OnceLock};

use regex::Regex;
use tracing::{info, warn};

use crate::traits::{GrantScope, PermissionRegistry, PermissionVerdict};

struct Lists {
    trusted: HashSet<String>,
    blocked: HashSet<String>,
    one_time: HashSet<String>,
    /// Times each one-time session was actually used.
    session_usage: HashMap<String, u64>,
}

/// Permission registry keyed by website domain.
///
/// One-time grants are session-scoped: they stay valid until cleared in
/// bulk with [`DomainGate::clear_one_time`]. Permanent grants and denials
/// move the domain out of the competing lists.
pub struct DomainGate {
    inner: Mutex<Lists>,
}

impl Default for DomainGate {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainGate {
    pub fn new() -> Self {
        Self::with_lists(&[], &[])
    }

    /// Seed the gate from configured trusted/blocked lists. Entries are
    /// normalized to bare domains; invalid ones are dropped with a warning.
    pub fn with_lists(trusted: &[String], blocked: &[String]) -> Self {
        let mut lists = Lists {
            trusted: HashSet::new(),
            blocked: HashSet::new(),
            one_time: HashSet::new(),
            session_usage: HashMap::new(),
        };
        for entry in trusted {
            let domain = Self::extract_domain(entry);
            if Self::is_valid_domain(&domain) {
                lists.trusted.insert(domain);
            } else {
                warn!(entry = %entry, "Ignoring invalid trusted domain");
            }
        }
        for entry in blocked {
            let domain = Self::extract_domain(entry);
            if Self::is_valid_domain(&domain) {
                lists.blocked.insert(domain);
            } else {
                warn!(entry = %entry, "Ignoring invalid blocked domain");
            }
        }
        Self {
            inner: Mutex::new(lists),
        }
    }

    /// Reduce a URL to its bare lowercased domain: scheme, leading `www.`,
    /// port, path, query, and fragment are stripped.
    pub fn extract_domain(url: &str) -> String {
        let lowered = url.trim().to_lowercase();
        let without_scheme = match lowered.find("://") {
            Some(idx) => &lowered[idx + 3..],
            None => lowered.as_str(),
        };
        let host = without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or("")
            .split(':')
            .next()
            .unwrap_or("");
        let host = host.strip_prefix("www.").unwrap_or(host);
        host.to_string()
    }

    /// Structural domain validation.
    pub fn is_valid_domain(domain: &str) -> bool {
        static RE: OnceLock<Regex> = OnceLock::new();
        let pattern = RE.get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
            )
            .expect("Invalid domain pattern")
        });
        !domain.is_empty() && pattern.is_match(domain)
    }

    /// Drop all one-time sessions, returning how many were cleared.
    pub fn clear_one_time(&self) -> usize {
        let mut lists = self.inner.lock().unwrap();
        let count = lists.one_time.len();
        lists.one_time.clear();
        lists.session_usage.clear();
        count
    }

    pub fn is_trusted(&self, domain: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .trusted
            .contains(&Self::extract_domain(domain))
    }

    pub fn is_blocked(&self, domain: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .blocked
            .contains(&Self::extract_domain(domain))
    }

    pub fn has_one_time(&self, domain: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .one_time
            .contains(&Self::extract_domain(domain))
    }
}

impl PermissionRegistry for DomainGate {
    fn check(&self, resource: &str) -> PermissionVerdict {
        let domain = Self::extract_domain(resource);
        if !Self::is_valid_domain(&domain) {
            warn!(resource, "Invalid domain in permission check");
            return PermissionVerdict::Denied;
        }

        let mut lists = self.inner.lock().unwrap();
        if lists.blocked.contains(&domain) {
            info!(%domain, "Access denied (blocklist)");
            return PermissionVerdict::Denied;
        }
        if lists.trusted.contains(&domain) {
            info!(%domain, "Access allowed (trusted)");
            return PermissionVerdict::Allowed;
        }
        if lists.one_time.contains(&domain) {
            *lists.session_usage.entry(domain.clone()).or_insert(0) += 1;
            info!(%domain, "Access allowed (one-time session)");
            return PermissionVerdict::Allowed;
        }
        info!(%domain, "Unknown domain, asking user");
        PermissionVerdict::Ask
    }

    fn grant(&self, resource: &str, scope: GrantScope) {
        let domain = Self::extract_domain(resource);
        if !Self::is_valid_domain(&domain) {
            warn!(resource, "Cannot grant access to invalid domain");
            return;
        }

        let mut lists = self.inner.lock().unwrap();
        match scope {
            GrantScope::Permanent => {
                lists.blocked.remove(&domain);
                lists.one_time.remove(&domain);
                info!(%domain, "Added to trusted list");
                lists.trusted.insert(domain);
            }
            GrantScope::Once => {
                info!(%domain, "Granted one-time session");
                lists.one_time.insert(domain);
            }
        }
    }

    fn deny(&self, resource: &str) {
        let domain = Self::extract_domain(resource);
        if !Self::is_valid_domain(&domain) {
            warn!(resource, "Cannot block invalid domain");
            return;
        }

        let mut lists = self.inner.lock().unwrap();
        lists.trusted.remove(&domain);
        lists.one_time.remove(&domain);
        info!(%domain, "Added to blocklist");
        lists.blocked.insert(domain);
    }
}
