//! Handlers for the `/subscription` resource (Telegram bot accounts).
//!
//! Accounts are addressed by their Telegram id, not by the internal row id.
//! Account creation and lookup are public because the bot calls them; granting
//! a paid plan requires an admin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use beatmarket_core::error::CoreError;
use beatmarket_core::pagination::{Page, PageRequest};
use beatmarket_core::subscriptions::{Plan, PLAN_MONTH, PLAN_YEAR};
use beatmarket_core::types::DbId;
use beatmarket_db::entity::Filter;
use beatmarket_db::models::telegram::{
    CreateTelegramAccount, CreateTelegramSubscription, SubscriptionResponse, TelegramAccount,
    TelegramAccountResponse, TelegramSubscription, UpdateTelegramAccount,
};
use beatmarket_db::repositories::fetch_page;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PageParams, TelegramIdParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body returned when an account is created.
#[derive(Debug, Serialize)]
pub struct TelegramAccountCreated {
    pub telegram_id: i64,
}

/// Request body for `POST /subscription/telegram/{telegram_id}/subscriptions`.
#[derive(Debug, Deserialize)]
pub struct GrantSubscriptionRequest {
    /// `"month"` or `"year"`.
    pub plan: String,
}

/// POST /api/v1/subscription/telegram?telegram_id=
pub async fn create_account(
    State(state): State<AppState>,
    Query(params): Query<TelegramIdParams>,
) -> AppResult<(StatusCode, Json<DataResponse<TelegramAccountCreated>>)> {
    let id = state
        .repos
        .telegram_accounts
        .create(&CreateTelegramAccount {
            telegram_id: params.telegram_id,
        })
        .await?;
    tracing::info!(
        account_id = id,
        telegram_id = params.telegram_id,
        "Telegram account created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TelegramAccountCreated {
                telegram_id: params.telegram_id,
            },
        }),
    ))
}

/// GET /api/v1/subscription/telegram?telegram_id=
///
/// The account with the newest subscription of each plan.
pub async fn get_account(
    State(state): State<AppState>,
    Query(params): Query<TelegramIdParams>,
) -> AppResult<Json<DataResponse<TelegramAccountResponse>>> {
    let account = find_account(&state, params.telegram_id).await?;
    let subscriptions = recent_subscriptions(&state, account.id).await?;

    let month = newest_of(&subscriptions, PLAN_MONTH);
    let year = newest_of(&subscriptions, PLAN_YEAR);
    Ok(Json(DataResponse {
        data: TelegramAccountResponse::new(account, month, year),
    }))
}

/// GET /api/v1/subscription/telegram/users
///
/// Paged Telegram ids of all accounts, newest first.
pub async fn list_telegram_ids(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<i64>>>> {
    let request = params.to_request()?;
    let page =
        fetch_page::<TelegramAccount, _>(state.repos.telegram_accounts.as_ref(), &request, None)
            .await?;
    Ok(Json(DataResponse {
        data: page.map(|account| account.telegram_id),
    }))
}

/// POST /api/v1/subscription/telegram/{telegram_id}/subscriptions
///
/// Grant a plan and flag the account subscribed. A grant while an earlier
/// subscription of the same plan is still running extends from its expiry.
/// The subscription insert and the account flag are separate writes.
pub async fn grant_subscription(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(telegram_id): Path<i64>,
    Json(input): Json<GrantSubscriptionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubscriptionResponse>>)> {
    let plan: Plan = input.plan.parse()?;
    let account = find_account(&state, telegram_id).await?;

    let subscriptions = recent_subscriptions(&state, account.id).await?;
    let now = Utc::now();
    let from = newest_of(&subscriptions, plan.as_str())
        .map(|current| current.expires_at.max(now))
        .unwrap_or(now);

    let id = state
        .repos
        .telegram_subscriptions
        .create(&CreateTelegramSubscription {
            telegram_account_id: account.id,
            plan: plan.as_str().to_string(),
            expires_at: plan.expires_at(from),
        })
        .await?;

    if !account.subscribe {
        state
            .repos
            .telegram_accounts
            .update(
                account.id,
                &UpdateTelegramAccount {
                    subscribe: Some(true),
                },
            )
            .await?;
    }

    tracing::info!(
        subscription_id = id,
        telegram_id,
        plan = %plan,
        admin_id = admin.user_id,
        "Subscription granted"
    );

    let subscription = state.repos.telegram_subscriptions.get_by_id(id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: subscription.into(),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_account(state: &AppState, telegram_id: i64) -> AppResult<TelegramAccount> {
    state
        .repos
        .telegram_accounts
        .find_one(&Filter::eq("telegram_id", telegram_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundBy {
            entity: "TelegramAccount",
            column: "telegram_id",
            value: telegram_id.to_string(),
        }))
}

/// Newest subscriptions of an account, newest first.
async fn recent_subscriptions(
    state: &AppState,
    account_id: DbId,
) -> AppResult<Vec<TelegramSubscription>> {
    let filter = Filter::eq("telegram_account_id", account_id);
    Ok(state
        .repos
        .telegram_subscriptions
        .list_page(&PageRequest::first_max(), Some(&filter))
        .await?)
}

fn newest_of(subscriptions: &[TelegramSubscription], plan: &str) -> Option<TelegramSubscription> {
    subscriptions.iter().find(|s| s.plan == plan).cloned()
}
