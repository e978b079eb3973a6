use std::net::IpAddr;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use dashmap::DashMap;
use ipnet::IpNet;

/// Fixed-window limit on anonymous contact submissions, per client IP.
pub struct ContactRateLimiter {
    /// ip -> (count, window_start)
    entries: DashMap<IpAddr, (u32, Instant)>,
}

impl ContactRateLimiter {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Count one submission. Err carries the seconds until the window resets.
    pub fn check(&self, ip: IpAddr, limit: u32, window_secs: u64) -> Result<(), u64> {
        let window = Duration::from_secs(window_secs);
        let now = Instant::now();

        let mut entry = self.entries.entry(ip).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > window {
            *count = 1;
            *start = now;
            return Ok(());
        }

        if *count >= limit {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(window_secs.saturating_sub(elapsed));
        }

        *count += 1;
        Ok(())
    }

    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries.retain(|_, (_, start)| now.duration_since(*start) < max_age);
    }
}

impl Default for ContactRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-email login brute force limiter: 5 failures per 15 minutes.
pub struct LoginRateLimiter {
    /// email -> (failed_count, window_start)
    entries: DashMap<String, (u32, Instant)>,
}

const LOGIN_WINDOW_SECS: u64 = 15 * 60;
const LOGIN_MAX_FAILURES: u32 = 5;

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Does not count anything; call `record_failure` on a bad password.
    pub fn check(&self, email: &str) -> Result<(), u64> {
        let window = Duration::from_secs(LOGIN_WINDOW_SECS);
        let now = Instant::now();

        let Some(entry) = self.entries.get(&email.to_lowercase()) else {
            return Ok(());
        };

        let (count, start) = entry.value();

        if now.duration_since(*start) > window {
            return Ok(());
        }

        if *count >= LOGIN_MAX_FAILURES {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(LOGIN_WINDOW_SECS.saturating_sub(elapsed));
        }

        Ok(())
    }

    pub fn record_failure(&self, email: &str) {
        let window = Duration::from_secs(LOGIN_WINDOW_SECS);
        let now = Instant::now();

        let mut entry = self.entries.entry(email.to_lowercase()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > window {
            *count = 1;
            *start = now;
        } else {
            *count += 1;
        }
    }

    pub fn clear(&self, email: &str) {
        self.entries.remove(&email.to_lowercase());
    }

    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries.retain(|_, (_, start)| now.duration_since(*start) < max_age);
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the client address, trusting `X-Forwarded-For` only from trusted proxies.
pub fn client_ip(headers: &HeaderMap, peer: IpAddr, trusted_proxies: &[IpNet]) -> IpAddr {
    if trusted_proxies.iter().any(|net| net.contains(&peer)) {
        if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            // rightmost hop that is not one of ours
            for ip in xff.split(',').rev().filter_map(|s| s.trim().parse::<IpAddr>().ok()) {
                if !trusted_proxies.iter().any(|net| net.contains(&ip)) {
                    return ip;
                }
            }
        }
    }

    peer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_limit_blocks_after_quota() {
        let limiter = ContactRateLimiter::new();
        let ip: IpAddr = "203.0.113.7".parse().unwrap();

        for _ in 0..3 {
            assert!(limiter.check(ip, 3, 60).is_ok());
        }
        let retry = limiter.check(ip, 3, 60).unwrap_err();
        assert!(retry <= 60);

        let other: IpAddr = "203.0.113.8".parse().unwrap();
        assert!(limiter.check(other, 3, 60).is_ok());
    }

    #[test]
    fn login_limit_counts_failures_only() {
        let limiter = LoginRateLimiter::new();
        for _ in 0..LOGIN_MAX_FAILURES {
            assert!(limiter.check("Admin@Example.org").is_ok());
            limiter.record_failure("admin@example.org");
        }
        assert!(limiter.check("ADMIN@example.org").is_err());

        limiter.clear("admin@example.org");
        assert!(limiter.check("admin@example.org").is_ok());
    }

    #[test]
    fn forwarded_for_needs_trusted_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "198.51.100.1, 10.0.0.2".parse().unwrap());
        let proxies: Vec<IpNet> = vec!["10.0.0.0/8".parse().unwrap()];

        let peer: IpAddr = "10.0.0.2".parse().unwrap();
        assert_eq!(
            client_ip(&headers, peer, &proxies),
            "198.51.100.1".parse::<IpAddr>().unwrap()
        );

        let untrusted: IpAddr = "192.0.2.50".parse().unwrap();
        assert_eq!(client_ip(&headers, untrusted, &proxies), untrusted);
        assert_eq!(client_ip(&headers, peer, &[]), peer);
    }
}
