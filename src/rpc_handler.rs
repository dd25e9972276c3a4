//! RPC method handler for the Markshelf JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so every method can be exercised in tests.
//! Method names mirror the backend operations where one exists.

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::api::BookmarkPatch;
use crate::types::bookmark::{NewBookmark, NewFolder, NewTag};
use crate::types::filter::{DateRange, SortOption, SortOrder};

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn opt_str_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

fn date_param(params: &Value, key: &str) -> Result<Option<DateTime<Local>>, String> {
    match opt_str_param(params, key) {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| Some(d.with_timezone(&Local)))
            .map_err(|e| format!("invalid {}: {}", key, e)),
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, String> {
    serde_json::from_value(value.clone()).map_err(|e| format!("invalid params: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn ok() -> Result<Value, String> {
    Ok(json!({"ok": true}))
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with a readable message.
pub async fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    let organizer = &app.organizer;
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Session ───
        "auth.login" => {
            let email = str_param(params, "email")?;
            let password = str_param(params, "password")?;
            let user = organizer.login(email, password).await.map_err(|e| e.to_string())?;
            to_json(&user)
        }
        "auth.logout" => {
            organizer.logout().await;
            ok()
        }
        "auth.user" => to_json(&organizer.current_user()),
        "library.load" => {
            organizer.load_all().await.map_err(|e| e.to_string())?;
            Ok(json!({
                "folders": organizer.folder_facets(),
                "tags": organizer.tag_facets(),
                "bookmarks": organizer.visible_bookmarks(),
            }))
        }

        // ─── Bookmarks ───
        "bookmarks.visible" => to_json(&organizer.visible_bookmarks()),
        "bookmarks.get" => {
            let id = str_param(params, "id")?;
            let bookmark = organizer
                .bookmark(id)
                .ok_or_else(|| format!("bookmark not found: {}", id))?;
            to_json(&bookmark)
        }
        "bookmarks.create" => {
            let draft: NewBookmark = parse(params)?;
            let bookmark = organizer.create_bookmark(draft).await.map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "bookmarks.update" => {
            let id = str_param(params, "id")?;
            let patch: BookmarkPatch = parse(params.get("patch").unwrap_or(&json!({})))?;
            let bookmark = organizer.update_bookmark(id, patch).await.map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "bookmarks.updateContent" => {
            let id = str_param(params, "id")?;
            let content = str_param(params, "content")?;
            let bookmark = organizer
                .update_bookmark_content(id, content)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "bookmarks.delete" => {
            let id = str_param(params, "id")?;
            organizer.delete_bookmark(id).await.map_err(|e| e.to_string())?;
            ok()
        }
        "bookmarks.visit" => {
            let id = str_param(params, "id")?;
            let bookmark = organizer.visit_bookmark(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"url": bookmark.url, "visitCount": bookmark.visit_count}))
        }

        // ─── Folders ───
        "folders.list" => to_json(&organizer.folder_facets()),
        "folders.create" => {
            let draft: NewFolder = parse(params)?;
            let folder = organizer
                .create_folder(draft, opt_str_param(params, "parentId"))
                .await
                .map_err(|e| e.to_string())?;
            to_json(&folder)
        }
        "folders.rename" => {
            let id = str_param(params, "id")?;
            let name = str_param(params, "name")?;
            organizer.rename_folder(id, name).await.map_err(|e| e.to_string())?;
            ok()
        }
        "folders.move" => {
            let id = str_param(params, "id")?;
            let target = str_param(params, "targetId")?;
            organizer.move_folder(id, target).await.map_err(|e| e.to_string())?;
            ok()
        }
        "folders.breadcrumbs" => match opt_str_param(params, "id") {
            Some(id) => to_json(&organizer.breadcrumbs_for(id)),
            None => to_json(&organizer.breadcrumbs()),
        },
        "folders.children" => {
            let id = str_param(params, "id")?;
            to_json(&organizer.subfolders_of(id))
        }
        "folders.toggleExpanded" => {
            let id = str_param(params, "id")?;
            Ok(json!({"expanded": organizer.toggle_expanded(id)}))
        }
        "folders.toggleExpandAll" => {
            organizer.toggle_expand_all();
            to_json(&organizer.expanded_folder_ids())
        }
        "folders.expanded" => to_json(&organizer.expanded_folder_ids()),

        // ─── Tags ───
        "tags.list" => to_json(&organizer.tag_facets()),
        "tags.create" => {
            let draft: NewTag = parse(params)?;
            let tag = organizer.create_tag(draft).await.map_err(|e| e.to_string())?;
            to_json(&tag)
        }
        "tags.reorder" => {
            let dragged = str_param(params, "draggedId")?;
            let target = str_param(params, "targetId")?;
            let tags = organizer.reorder_tags(dragged, target).await.map_err(|e| e.to_string())?;
            to_json(&tags)
        }

        // ─── View ───
        "view.get" => Ok(json!({
            "criteria": organizer.criteria(),
            "hasActiveFilters": organizer.has_active_filters(),
        })),
        "view.selectFolder" => {
            organizer.select_folder(str_param(params, "id")?);
            ok()
        }
        "view.search" => {
            organizer.set_search_query(opt_str_param(params, "query").unwrap_or(""));
            ok()
        }
        "view.toggleTag" => {
            organizer.toggle_tag(str_param(params, "name")?);
            ok()
        }
        "view.clearTags" => {
            organizer.clear_tags();
            ok()
        }
        "view.pickDate" => {
            let date = date_param(params, "date")?.ok_or("missing date")?;
            organizer.pick_calendar_date(date);
            to_json(&organizer.criteria().date_range)
        }
        "view.setDateRange" => {
            let range = DateRange {
                start: date_param(params, "start")?,
                end: date_param(params, "end")?,
            };
            organizer.set_date_range(range);
            ok()
        }
        "view.clearDateRange" => {
            organizer.clear_date_range();
            ok()
        }
        "view.sort" => {
            if let Some(option) = params.get("option") {
                organizer.set_sort_option(parse::<SortOption>(option)?);
            }
            if let Some(order) = params.get("order") {
                organizer.set_sort_order(parse::<SortOrder>(order)?);
            }
            to_json(&organizer.criteria())
        }
        "calendar.days" => {
            let year = params.get("year").and_then(|v| v.as_i64()).ok_or("missing year")?;
            let month = params.get("month").and_then(|v| v.as_u64()).ok_or("missing month")?;
            if !(1..=12).contains(&month) {
                return Err(format!("invalid month: {}", month));
            }
            let year = i32::try_from(year).map_err(|_| format!("invalid year: {}", year))?;
            to_json(&organizer.days_with_bookmarks(year, month as u32))
        }

        // ─── Settings ───
        "settings.get" => to_json(app.settings_engine.get_settings()),
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            app.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            ok()
        }
        "settings.reset" => {
            app.settings_engine.reset().map_err(|e| e.to_string())?;
            ok()
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
