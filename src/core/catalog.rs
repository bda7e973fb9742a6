//! Sample content for the demo screens.
//!
//! Screens never reach for global constants; they receive a [`Catalog`] at
//! construction so tests (and the `--cards` flag) can hand them empty,
//! single-item, or oversized lists.

/// One card in the Today list.
#[derive(Debug, Clone, PartialEq)]
pub struct TodayCard {
    /// Small label above the title, e.g. "APP OF THE DAY".
    pub eyebrow: String,
    pub title: String,
    pub app_name: String,
    pub tagline: String,
    /// Long-form text shown once the card is expanded.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    /// Where playable media lives, if the title has any.
    pub media: Option<String>,
}

impl Movie {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            media: None,
        }
    }

    pub fn with_media(mut self, media: &str) -> Self {
        self.media = Some(media.to_string());
        self
    }
}

/// A titled horizontal row of posters.
#[derive(Debug, Clone, PartialEq)]
pub struct Shelf {
    pub title: String,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub cards: Vec<TodayCard>,
    pub hero: Movie,
    pub previews: Vec<Movie>,
    pub shelves: Vec<Shelf>,
    /// Title shown in the inline preview player.
    pub featured: Movie,
}

const BODY: &str = "Chewy, sweet and a little bit silly: this is the tapioca tracker \
you didn't know you needed. Log every cup, rate the pearls, and find the \
best shop within walking distance.\n\n\
Streaks reward the dedicated. Badges celebrate the curious. A tiny \
barista animation cheers you on when you try something new.\n\n\
Everything stays on your device. No accounts, no ads, no tracking — \
just you and your next drink.";

impl Catalog {
    /// The demo catalog with the default five Today cards.
    pub fn sample() -> Self {
        Self::with_card_count(5)
    }

    /// The demo catalog with exactly `count` Today cards.
    pub fn with_card_count(count: usize) -> Self {
        let cards = (0..count)
            .map(|i| TodayCard {
                eyebrow: "APP OF THE DAY".to_string(),
                title: format!("Today's App #{}", i + 1),
                app_name: "My Tapioca App".to_string(),
                tagline: "This is a wonderful tapioca app.".to_string(),
                body: BODY.to_string(),
            })
            .collect();

        let all = vec![
            Movie::new("Mild Speed"),
            Movie::new("The Half-Naked Director"),
            Movie::new("Stove Jobs"),
            Movie::new("Spinning Man").with_media("movie.mp4"),
            Movie::new("Go-Ranger Things"),
        ];

        Self {
            cards,
            hero: Movie::new("Go-Ranger Things"),
            previews: all.clone(),
            shelves: vec![
                Shelf {
                    title: "Trending Now".to_string(),
                    movies: all.clone(),
                },
                Shelf {
                    title: "My List".to_string(),
                    movies: all.clone(),
                },
                Shelf {
                    title: "Watch It Again".to_string(),
                    movies: all,
                },
            ],
            featured: Movie::new("Spinning Man").with_media("movie.mp4"),
        }
    }

    /// A catalog with nothing in it.
    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            hero: Movie::new(""),
            previews: Vec::new(),
            shelves: Vec::new(),
            featured: Movie::new(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_count_is_injectable() {
        assert!(Catalog::with_card_count(0).cards.is_empty());
        assert_eq!(Catalog::with_card_count(1).cards.len(), 1);
        assert_eq!(Catalog::with_card_count(500).cards.len(), 500);
        assert_eq!(Catalog::sample().cards.len(), 5);
    }

    #[test]
    fn featured_title_is_playable() {
        assert!(Catalog::sample().featured.media.is_some());
    }
}
