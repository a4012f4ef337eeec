//! Image and song fixtures

use emotune_client::capture::ImageIngestAdapter;
use emotune_client::models::{CapturedImage, FileBlob, Recommendation};
use emotune_common::events::ClientEvent;
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;
use tokio::sync::broadcast;

/// Solid-color JPEG of the given size
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([180, 90, 60]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

pub fn jpeg_blob(name: &str) -> FileBlob {
    FileBlob::new(name, Some("image/jpeg"), jpeg_bytes(16, 16))
}

/// A validated JPEG as the workflow would receive it
pub fn captured_jpeg(name: &str) -> CapturedImage {
    ImageIngestAdapter::from_file(jpeg_blob(name)).unwrap()
}

pub fn song(title: &str, embed: Option<&str>) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        artist: format!("{} Artist", title),
        album_art_url: Some(format!("https://i.scdn.co/image/{}", title.to_lowercase())),
        embed_url: embed.map(str::to_string),
    }
}

/// Wire form of one recommendation
pub fn song_json(title: &str, embed: Option<&str>) -> Value {
    json!({
        "title": title,
        "artist": format!("{} Artist", title),
        "album_art": format!("https://i.scdn.co/image/{}", title.to_lowercase()),
        "preview_url": null,
        "embed_url": embed,
    })
}

/// Everything currently queued on a subscriber
pub fn drain_events(rx: &mut broadcast::Receiver<ClientEvent>) -> Vec<ClientEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
