//! The fixed, ordered list of playable media items
//!
//! Constructed once at startup and never mutated. Previous/next navigation
//! is defined by catalog order and stops at the edges.

use crate::{Error, MediaItem, Result};
use url::Url;

/// Ordered, immutable media catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<MediaItem>,
}

impl Catalog {
    /// Create a catalog from an ordered item list
    pub fn new(items: Vec<MediaItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        Ok(Self { items })
    }

    /// The built-in demo catalog (the Google sample video set)
    pub fn sample() -> Self {
        let entries: &[(&str, &str, &str, &str, &str)] = &[
            (
                "big-buck-bunny",
                "Big Buck Bunny",
                "Open source animated short film by the Blender Institute",
                "10:53",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
            ),
            (
                "elephants-dream",
                "Elephants Dream",
                "The world's first open movie, made entirely with open source software",
                "10:57",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
            ),
            (
                "for-bigger-blazes",
                "For Bigger Blazes",
                "Sample video for testing video players and streaming",
                "0:15",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
            ),
            (
                "for-bigger-escape",
                "For Bigger Escape",
                "Another sample video for testing purposes",
                "0:15",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerEscape.mp4",
            ),
            (
                "for-bigger-fun",
                "For Bigger Fun",
                "Sample video demonstrating video playback capabilities",
                "0:15",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerFun.mp4",
            ),
            (
                "for-bigger-joyrides",
                "For Bigger Joyrides",
                "Sample video for testing video streaming",
                "0:15",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerJoyrides.mp4",
            ),
            (
                "for-bigger-meltdowns",
                "For Bigger Meltdowns",
                "Sample video demonstrating video player functionality",
                "0:15",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerMeltdowns.mp4",
            ),
            (
                "sintel",
                "Sintel",
                "Open source animated short film by the Blender Foundation",
                "14:48",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/Sintel.mp4",
            ),
            (
                "tears-of-steel",
                "Tears of Steel",
                "Open source science fiction film by the Blender Foundation",
                "12:14",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/TearsOfSteel.mp4",
            ),
            (
                "we-are-going-on-bullrun",
                "We Are Going on Bullrun",
                "Sample video for testing video playback",
                "0:13",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/WeAreGoingOnBullrun.mp4",
            ),
            (
                "what-car-can-you-get-for-a-grand",
                "What Car Can You Get For a Grand?",
                "Sample video demonstrating video streaming capabilities",
                "0:13",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/WhatCarCanYouGetForAGrand.mp4",
            ),
        ];

        let items = entries
            .iter()
            .map(|(id, title, description, duration, url)| {
                MediaItem::new(
                    *id,
                    *title,
                    *description,
                    *duration,
                    Url::parse(url).expect("sample catalog URL"),
                )
            })
            .collect();

        Self { items }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at position
    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    /// Find an item by id, returning its position and the item
    pub fn find(&self, id: &str) -> Option<(usize, &MediaItem)> {
        self.items
            .iter()
            .enumerate()
            .find(|(_, item)| item.id == id)
    }

    /// All items, in catalog order
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Position of the entry before `index`, if any
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        index.checked_sub(1)
    }

    /// Position of the entry after `index`, if any
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.items.len()).then_some(next)
    }
}
