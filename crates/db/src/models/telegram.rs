//! Telegram subscription accounts and their paid plans.

use beatmarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::entity::{push_some, Entity, Fields, Lifecycle, Value};
use crate::repositories::memory::MemoryEntity;

/// A row from the `telegram_accounts` table.
#[derive(Debug, Clone, FromRow)]
pub struct TelegramAccount {
    pub id: DbId,
    pub telegram_id: i64,
    pub subscribe: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateTelegramAccount {
    pub telegram_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTelegramAccount {
    pub subscribe: Option<bool>,
}

/// A row from the `telegram_subscriptions` table.
#[derive(Debug, Clone, FromRow)]
pub struct TelegramSubscription {
    pub id: DbId,
    pub telegram_account_id: DbId,
    pub plan: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateTelegramSubscription {
    pub telegram_account_id: DbId,
    pub plan: String,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTelegramSubscription {
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub plan: String,
    pub expires_at: Timestamp,
}

impl From<TelegramSubscription> for SubscriptionResponse {
    fn from(sub: TelegramSubscription) -> Self {
        Self {
            plan: sub.plan,
            expires_at: sub.expires_at,
        }
    }
}

/// Account view with the newest subscription of each plan.
#[derive(Debug, Clone, Serialize)]
pub struct TelegramAccountResponse {
    pub telegram_id: i64,
    pub subscribe: bool,
    pub only_telegram_subscribe_month: Option<SubscriptionResponse>,
    pub only_telegram_subscribe_year: Option<SubscriptionResponse>,
}

impl TelegramAccountResponse {
    pub fn new(
        account: TelegramAccount,
        month: Option<TelegramSubscription>,
        year: Option<TelegramSubscription>,
    ) -> Self {
        Self {
            telegram_id: account.telegram_id,
            subscribe: account.subscribe,
            only_telegram_subscribe_month: month.map(Into::into),
            only_telegram_subscribe_year: year.map(Into::into),
        }
    }
}

impl Entity for TelegramAccount {
    type Create = CreateTelegramAccount;
    type Update = UpdateTelegramAccount;

    const NAME: &'static str = "TelegramAccount";
    const TABLE: &'static str = "telegram_accounts";
    const COLUMNS: &'static str = "id, telegram_id, subscribe, created_at, updated_at";
    const OWNER_COLUMN: Option<&'static str> = None;
    const LIFECYCLE: Lifecycle = Lifecycle::HardDelete;
    const FILTERABLE: &'static [&'static str] = &["telegram_id", "subscribe"];

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> Option<DbId> {
        None
    }

    fn column_value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "telegram_id" => Some(self.telegram_id.into()),
            "subscribe" => Some(self.subscribe.into()),
            _ => None,
        }
    }

    fn insert_fields(input: &CreateTelegramAccount) -> Fields {
        vec![("telegram_id", input.telegram_id.into())]
    }

    fn update_fields(input: &UpdateTelegramAccount) -> Fields {
        let mut fields = Fields::new();
        push_some(&mut fields, "subscribe", &input.subscribe);
        fields
    }
}

impl MemoryEntity for TelegramAccount {
    const UNIQUE: &'static [&'static str] = &["telegram_id"];

    fn materialize(id: DbId, input: &CreateTelegramAccount, now: Timestamp) -> Self {
        Self {
            id,
            telegram_id: input.telegram_id,
            subscribe: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateTelegramAccount) {
        if let Some(subscribe) = input.subscribe {
            self.subscribe = subscribe;
        }
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }
}

impl Entity for TelegramSubscription {
    type Create = CreateTelegramSubscription;
    type Update = UpdateTelegramSubscription;

    const NAME: &'static str = "TelegramSubscription";
    const TABLE: &'static str = "telegram_subscriptions";
    const COLUMNS: &'static str =
        "id, telegram_account_id, plan, expires_at, created_at, updated_at";
    const OWNER_COLUMN: Option<&'static str> = Some("telegram_account_id");
    const LIFECYCLE: Lifecycle = Lifecycle::HardDelete;
    const FILTERABLE: &'static [&'static str] = &["telegram_account_id"];

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> Option<DbId> {
        Some(self.telegram_account_id)
    }

    fn column_value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "telegram_account_id" => Some(self.telegram_account_id.into()),
            _ => None,
        }
    }

    fn insert_fields(input: &CreateTelegramSubscription) -> Fields {
        vec![
            ("telegram_account_id", input.telegram_account_id.into()),
            ("plan", input.plan.clone().into()),
            ("expires_at", input.expires_at.into()),
        ]
    }

    fn update_fields(input: &UpdateTelegramSubscription) -> Fields {
        let mut fields = Fields::new();
        push_some(&mut fields, "expires_at", &input.expires_at);
        fields
    }
}

impl MemoryEntity for TelegramSubscription {
    fn materialize(id: DbId, input: &CreateTelegramSubscription, now: Timestamp) -> Self {
        Self {
            id,
            telegram_account_id: input.telegram_account_id,
            plan: input.plan.clone(),
            expires_at: input.expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateTelegramSubscription) {
        if let Some(expires_at) = input.expires_at {
            self.expires_at = expires_at;
        }
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }
}
