//! Trace sampling policy for the error tracker
//!
//! Maps a request's URL and HTTP method to a sampling probability in [0, 1].
//! Rules are checked in order and the first match wins: ignores (plus the
//! built-in health-check path and OPTIONS preflights) sample at zero, custom
//! URL patterns sample at their own rate, everything else at the default
//! rate. Matching is substring containment, never exact or prefix matching.

use rand::Rng;

/// Health-check path excluded from tracing even when no explicit ignore list
/// is configured.
pub const HEALTH_CHECK_PATH: &str = "/health";

const DEFAULT_CUSTOM_URLS_SAMPLE_RATE: f64 = 0.1;

/// URL rule sets for [`TraceSampler`].
#[derive(Debug, Clone)]
pub struct SamplingOptions {
    /// URL patterns that are never traced.
    pub ignore_urls: Vec<String>,
    /// URL patterns traced at `custom_urls_sample_rate` instead of the
    /// default rate.
    pub custom_urls: Vec<String>,
    /// Rate applied to `custom_urls` matches.
    pub custom_urls_sample_rate: f64,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            ignore_urls: Vec::new(),
            custom_urls: Vec::new(),
            custom_urls_sample_rate: DEFAULT_CUSTOM_URLS_SAMPLE_RATE,
        }
    }
}

impl SamplingOptions {
    #[must_use]
    pub fn with_ignore_urls(mut self, urls: Vec<String>) -> Self {
        self.ignore_urls = urls;
        self
    }

    #[must_use]
    pub fn with_custom_urls(mut self, urls: Vec<String>) -> Self {
        self.custom_urls = urls;
        self
    }

    #[must_use]
    pub fn with_custom_urls_sample_rate(mut self, rate: f64) -> Self {
        self.custom_urls_sample_rate = rate.clamp(0.0, 1.0);
        self
    }
}

/// Sampling decision function installed as the error tracker's tracing
/// callback.
#[derive(Debug, Clone)]
pub struct TraceSampler {
    ignore_urls: Vec<String>,
    custom_urls: Vec<String>,
    traces_sample_rate: f64,
    custom_urls_sample_rate: f64,
}

impl TraceSampler {
    pub fn new(traces_sample_rate: f64, options: SamplingOptions) -> Self {
        let mut ignore_urls = options.ignore_urls;
        if !ignore_urls.iter().any(|p| p == HEALTH_CHECK_PATH) {
            ignore_urls.push(HEALTH_CHECK_PATH.to_string());
        }

        Self {
            ignore_urls,
            custom_urls: options.custom_urls,
            traces_sample_rate: traces_sample_rate.clamp(0.0, 1.0),
            custom_urls_sample_rate: options.custom_urls_sample_rate.clamp(0.0, 1.0),
        }
    }

    /// The sampling rate for one request. First matching rule wins; rules are
    /// never combined.
    pub fn rate_for(&self, url: &str, method: &str) -> f64 {
        if method.eq_ignore_ascii_case("OPTIONS")
            || self.ignore_urls.iter().any(|p| url.contains(p.as_str()))
        {
            return 0.0;
        }

        if self.custom_urls.iter().any(|p| url.contains(p.as_str())) {
            return self.custom_urls_sample_rate;
        }

        self.traces_sample_rate
    }

    /// Sampling rate for an error-tracker transaction name such as
    /// `"GET /users/42"`.
    pub fn rate_for_transaction(&self, name: &str) -> f64 {
        match name.split_once(' ') {
            Some((method, url)) => self.rate_for(url, method),
            None => self.rate_for(name, ""),
        }
    }

    /// Roll the dice against [`rate_for`](Self::rate_for), for callers
    /// instrumenting requests manually.
    pub fn should_sample(&self, url: &str, method: &str) -> bool {
        let rate = self.rate_for(url, method);

        if rate >= 1.0 {
            return true;
        }
        if rate <= 0.0 {
            return false;
        }

        rand::thread_rng().gen::<f64>() < rate
    }
}
