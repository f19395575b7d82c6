//! Artist queries

use artbridge_core::{error::Result, store::NewArtist, types::*};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::StorageError;

const COLUMNS: &str = "id, name, info, real_name, img_url, phone, career, artwork_title,
     member_id, member_login, member_name, status, created_at, updated_at";

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

fn map_row(row: &SqliteRow) -> std::result::Result<Artist, StorageError> {
    let status: String = row.get("status");
    let status = status
        .parse::<ArtistStatus>()
        .map_err(|e| StorageError::Query(e.to_string()))?;

    Ok(Artist {
        id: row.get("id"),
        profile: ArtistProfile {
            name: row.get("name"),
            info: row.get("info"),
            real_name: row.get("real_name"),
            img_url: row.get("img_url"),
            phone: row.get("phone"),
            career: row.get("career"),
            artwork_title: row.get("artwork_title"),
        },
        owner: Owner {
            id: row.get("member_id"),
            login: row.get("member_login"),
            name: row.get("member_name"),
        },
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_rows(rows: &[SqliteRow]) -> Result<Vec<Artist>> {
    rows.iter()
        .map(|row| map_row(row).map_err(Into::into))
        .collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: ArtistId) -> Result<Option<Artist>> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM artists WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_row).transpose()?)
}

pub async fn create(pool: &SqlitePool, artist: NewArtist) -> Result<Artist> {
    let row = sqlx::query(&format!(
        "INSERT INTO artists (name, info, real_name, img_url, phone, career, artwork_title,
                              member_id, member_login, member_name, status)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(&artist.profile.name)
    .bind(&artist.profile.info)
    .bind(&artist.profile.real_name)
    .bind(&artist.profile.img_url)
    .bind(&artist.profile.phone)
    .bind(&artist.profile.career)
    .bind(&artist.profile.artwork_title)
    .bind(artist.owner.id)
    .bind(&artist.owner.login)
    .bind(&artist.owner.name)
    .bind(artist.status.as_str())
    .fetch_one(pool)
    .await?;

    Ok(map_row(&row)?)
}

pub async fn update_profile(
    pool: &SqlitePool,
    id: ArtistId,
    profile: &ArtistProfile,
    status: ArtistStatus,
) -> Result<Option<Artist>> {
    let row = sqlx::query(&format!(
        "UPDATE artists
         SET name = ?, info = ?, real_name = ?, img_url = ?, phone = ?, career = ?,
             artwork_title = ?, status = ?, updated_at = {NOW}
         WHERE id = ?
         RETURNING {COLUMNS}"
    ))
    .bind(&profile.name)
    .bind(&profile.info)
    .bind(&profile.real_name)
    .bind(&profile.img_url)
    .bind(&profile.phone)
    .bind(&profile.career)
    .bind(&profile.artwork_title)
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(map_row).transpose()?)
}

pub async fn set_status(
    pool: &SqlitePool,
    id: ArtistId,
    status: ArtistStatus,
) -> Result<Option<Artist>> {
    let row = sqlx::query(&format!(
        "UPDATE artists SET status = ?, updated_at = {NOW}
         WHERE id = ?
         RETURNING {COLUMNS}"
    ))
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(map_row).transpose()?)
}

/// Overwrite the embedded member name; unchanged values are not rewritten
pub async fn set_owner_name(pool: &SqlitePool, id: ArtistId, name: &str) -> Result<bool> {
    let result = sqlx::query(&format!(
        "UPDATE artists SET member_name = ?, updated_at = {NOW}
         WHERE id = ? AND member_name <> ?"
    ))
    .bind(name)
    .bind(id)
    .bind(name)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: ArtistId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_by_status(
    pool: &SqlitePool,
    status: ArtistStatus,
    page: PageRequest,
) -> Result<Page<Artist>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artists WHERE status = ?")
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM artists
         WHERE status = ?
         ORDER BY id DESC
         LIMIT ? OFFSET ?"
    ))
    .bind(status.as_str())
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    Ok(Page::new(map_rows(&rows)?, page, total.max(0) as u64))
}

pub async fn get_by_member(pool: &SqlitePool, member_id: OwnerId) -> Result<Vec<Artist>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM artists
         WHERE member_id = ?
         ORDER BY id DESC"
    ))
    .bind(member_id)
    .fetch_all(pool)
    .await?;

    map_rows(&rows)
}
