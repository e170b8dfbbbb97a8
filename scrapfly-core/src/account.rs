use serde::{Deserialize, Serialize};

use crate::decode;
use crate::error::ScrapflyError;
use crate::request::{ApiOperation, ApiRequest, HttpMethod, RawResponse, RequestKind};

/// Account, project and subscription details returned by `/account`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(default)]
    pub account: Account,
    #[serde(default)]
    pub project: Project,
    #[serde(default)]
    pub subscription: Subscription,
}

impl AccountData {
    /// Scrape requests left in the current period.
    pub fn remaining_scrapes(&self) -> i64 {
        self.subscription.usage.scrape.remaining
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub suspension_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub allow_extra_usage: bool,
    #[serde(default)]
    pub allowed_networks: Vec<String>,
    #[serde(default)]
    pub budget_limit: Option<f64>,
    #[serde(default)]
    pub budget_spent: Option<f64>,
    #[serde(default)]
    pub concurrency_limit: Option<u32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quota_reached: bool,
    #[serde(default)]
    pub scrape_request_count: i64,
    #[serde(default)]
    pub scrape_request_limit: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub billing: SubscriptionBilling,
    #[serde(default)]
    pub extra_scrape_allowed: bool,
    #[serde(default)]
    pub max_concurrency: u32,
    #[serde(default)]
    pub period: SubscriptionPeriod,
    #[serde(default)]
    pub plan_name: String,
    #[serde(default)]
    pub usage: SubscriptionUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionUsage {
    #[serde(default)]
    pub spider: UsageCounter,
    #[serde(default)]
    pub schedule: UsageCounter,
    #[serde(default)]
    pub scrape: ScrapeUsage,
}

/// Current/limit pair used by spider and schedule usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageCounter {
    #[serde(default)]
    pub current: i64,
    #[serde(default)]
    pub limit: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeUsage {
    #[serde(default)]
    pub concurrent_limit: i64,
    #[serde(default)]
    pub concurrent_remaining: i64,
    #[serde(default)]
    pub concurrent_usage: i64,
    #[serde(default)]
    pub current: i64,
    #[serde(default)]
    pub extra: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub remaining: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPeriod {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionBilling {
    #[serde(default)]
    pub current_extra_scrape_request_price: Price,
    #[serde(default)]
    pub extra_scrape_request_price_per_10k: Price,
    #[serde(default)]
    pub ongoing_payment: Price,
    #[serde(default)]
    pub plan_price: Price,
}

/// The `/account` call. Takes no parameters besides the API key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountRequest;

impl ApiOperation for AccountRequest {
    type Output = AccountData;

    const KIND: RequestKind = RequestKind::Account;

    fn validate(&self) -> Result<(), ScrapflyError> {
        Ok(())
    }

    fn to_request(&self) -> Result<ApiRequest, ScrapflyError> {
        Ok(ApiRequest::new(RequestKind::Account, HttpMethod::Get))
    }

    fn decode(&self, response: &RawResponse) -> Result<AccountData, ScrapflyError> {
        decode::decode_account(&response.body)
    }

    fn label(&self) -> &str {
        "account"
    }
}
