use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::{resolve_tag, ApiError, TagParams};
use crate::calculate::{
    build_roster_view, build_summary, summarize_raids, PortalSummary, RaidSummary, RosterView,
};
use crate::fetch::{current_war_or_unavailable, UpstreamErrorKind};

/// Both war rosters side by side.
pub async fn current_war(
    State(state): State<AppState>,
    Query(params): Query<TagParams>,
) -> Result<Json<RosterView>, ApiError> {
    let tag = resolve_tag(params.tag.as_deref(), state.config.server.default_tag())?;
    let war = current_war_or_unavailable(state.clash.as_ref(), &tag).await?;

    Ok(Json(build_roster_view(&war)))
}

/// Clan profile, recent wars and current war at a glance.
///
/// The clan profile is required. A private war log (403) or missing one
/// (404) yields an empty list; a private or absent current war is left out.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<TagParams>,
) -> Result<Json<PortalSummary>, ApiError> {
    let tag = resolve_tag(params.tag.as_deref(), state.config.server.default_tag())?;
    let clash = state.clash.as_ref();

    let clan = clash.clan(&tag).await?;

    let (warlog, warlog_private) = match clash
        .war_log(&tag, state.config.upstream.warlog_limit)
        .await
    {
        Ok(items) => (items, false),
        Err(e) if e.kind() == UpstreamErrorKind::PrivacyFault => {
            info!("War log for {} is private", tag);
            (Vec::new(), true)
        }
        Err(e) if e.kind() == UpstreamErrorKind::NotFound => (Vec::new(), false),
        Err(e) => return Err(e.into()),
    };

    let current = match clash.current_war(&tag).await {
        Ok(war) => Some(war),
        Err(e) if e.is_unavailable() => {
            warn!("Current war for {} unavailable: {}", tag, e);
            None
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(build_summary(
        &clan,
        &warlog,
        warlog_private,
        current.as_ref(),
        Utc::now(),
    )))
}

/// Ongoing capital raid plus lifetime totals over recent seasons.
pub async fn raids(
    State(state): State<AppState>,
    Query(params): Query<TagParams>,
) -> Result<Json<RaidSummary>, ApiError> {
    let tag = resolve_tag(params.tag.as_deref(), state.config.server.default_tag())?;
    let seasons = state
        .clash
        .capital_raid_seasons(&tag, state.config.upstream.raid_season_limit)
        .await?;

    Ok(Json(summarize_raids(&seasons)))
}
