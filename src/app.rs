use crate::dashboard::{self, DashboardContent};
use crate::data::LoadedAssets;
use crate::map::OutlineSheet;
use crate::news::{NewsFeed, NewsGate, NewsUpdate};
use crate::stats::RegionStats;

/// Which region level is on screen. A persistent two-state toggle driven by
/// pointer clicks; there is no terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    National,
    Regional,
}

/// Clickable rectangle over the regional outline, in frame cell coordinates.
/// Derived from the frame dimensions by fixed proportions; recomputed on
/// resize, never animated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Hitbox {
    /// Rough position of California within the national map.
    /// Tweak 0.06 / 0.42 / 0.14 / 0.34 if the box drifts off the outline.
    pub fn for_frame(width: f64, height: f64) -> Self {
        let margin = width * 0.04;
        let map_w = width - margin * 2.0;
        let map_h = height - margin * 2.0;

        Self {
            x: margin + map_w * 0.06,
            y: margin + map_h * 0.42,
            w: map_w * 0.14,
            h: map_h * 0.34,
        }
    }

    /// Inclusive bounds test: all four edges count as inside
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// Application state. All mutation happens on the single event thread.
pub struct App {
    pub view: View,
    pub hitbox: Hitbox,
    pub frame_width: u16,
    pub frame_height: u16,
    pub stats_national: Option<RegionStats>,
    pub stats_regional: Option<RegionStats>,
    pub national_outline: OutlineSheet,
    pub regional_outline: OutlineSheet,
    pub dashboard: DashboardContent,
    pub news_gate: NewsGate,
    pub news: NewsFeed,
    /// Current mouse position for hover highlighting
    pub mouse_pos: Option<(u16, u16)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(width: u16, height: u16, assets: LoadedAssets) -> Self {
        let dashboard = dashboard::project(
            View::National,
            assets.stats_national.as_ref(),
            assets.stats_regional.as_ref(),
        );

        Self {
            view: View::National,
            hitbox: Hitbox::for_frame(width as f64, height as f64),
            frame_width: width,
            frame_height: height,
            stats_national: assets.stats_national,
            stats_regional: assets.stats_regional,
            national_outline: assets.national_outline,
            regional_outline: assets.regional_outline,
            dashboard,
            news_gate: NewsGate::new(),
            news: NewsFeed::new(),
            mouse_pos: None,
            should_quit: false,
        }
    }

    /// Handle a pointer-down at frame coordinates.
    ///
    /// In the national view a click only drills in when it lands inside the
    /// hitbox; anywhere else is a no-op that touches neither the dashboard
    /// nor the news gate. In the regional view any click returns to national.
    /// Returns the view to fetch news for when the gate allowed a fetch.
    pub fn pointer_down(&mut self, px: f64, py: f64) -> Option<View> {
        let next = match self.view {
            View::National => {
                if self.hitbox.contains(px, py) {
                    View::Regional
                } else {
                    return None;
                }
            }
            View::Regional => View::National,
        };
        self.enter(next)
    }

    /// The startup fetch for the initial national view
    pub fn startup_fetch(&mut self) -> Option<View> {
        self.fetch_decision(self.view)
    }

    /// Apply a transition: projection first, then the fetch decision,
    /// each exactly once.
    fn enter(&mut self, next: View) -> Option<View> {
        self.view = next;
        self.dashboard = dashboard::project(
            next,
            self.stats_national.as_ref(),
            self.stats_regional.as_ref(),
        );
        self.fetch_decision(next)
    }

    fn fetch_decision(&mut self, view: View) -> Option<View> {
        if self.news_gate.should_fetch(view) {
            self.news_gate.mark_fetched(view);
            Some(view)
        } else {
            None
        }
    }

    /// Apply a completed news fetch, discarding results tagged with a view
    /// the user has since navigated away from.
    pub fn apply_news(&mut self, update: NewsUpdate) {
        if update.view != self.view {
            return;
        }
        self.news.apply(update.result);
    }

    /// Recompute the hitbox when the terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.frame_width = width;
        self.frame_height = height;
        self.hitbox = Hitbox::for_frame(width as f64, height as f64);
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Whether the pointer currently rests on the drill-down hitbox
    pub fn hovering_hitbox(&self) -> bool {
        self.view == View::National
            && self
                .mouse_pos
                .is_some_and(|(col, row)| self.hitbox.contains(col as f64, row as f64))
    }

    /// Stats backing the current view, if loaded
    pub fn active_stats(&self) -> Option<&RegionStats> {
        match self.view {
            View::National => self.stats_national.as_ref(),
            View::Regional => self.stats_regional.as_ref(),
        }
    }

    /// Outline backing the current view
    pub fn active_outline(&self) -> &OutlineSheet {
        match self.view {
            View::National => &self.national_outline,
            View::Regional => &self.regional_outline,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map;
    use crate::news::Headline;
    use crate::stats::RegionStats;

    fn test_assets() -> LoadedAssets {
        LoadedAssets {
            stats_national: Some(RegionStats::parse(
                vec![("Robbery", "1,000"), ("Theft", "500")],
                "California 2024",
            )),
            stats_regional: Some(RegionStats::parse(
                vec![("Robbery", "37")],
                "Alameda County 2024",
            )),
            national_outline: map::national_fallback(),
            regional_outline: map::regional_fallback(),
        }
    }

    fn test_app() -> App {
        App::new(100, 50, test_assets())
    }

    #[test]
    fn test_hitbox_edges_inclusive() {
        let hit = Hitbox {
            x: 10.0,
            y: 10.0,
            w: 20.0,
            h: 10.0,
        };

        // All four corners are inside
        assert!(hit.contains(10.0, 10.0));
        assert!(hit.contains(30.0, 10.0));
        assert!(hit.contains(10.0, 20.0));
        assert!(hit.contains(30.0, 20.0));

        // One unit past any edge is outside
        assert!(!hit.contains(9.0, 10.0));
        assert!(!hit.contains(10.0, 9.0));
        assert!(!hit.contains(31.0, 20.0));
        assert!(!hit.contains(30.0, 21.0));
    }

    #[test]
    fn test_hitbox_proportions_track_frame() {
        let hit = Hitbox::for_frame(100.0, 100.0);
        let margin = 4.0;
        let map_w = 92.0;
        let map_h = 92.0;

        assert!((hit.x - (margin + map_w * 0.06)).abs() < 1e-9);
        assert!((hit.y - (margin + map_h * 0.42)).abs() < 1e-9);
        assert!((hit.w - map_w * 0.14).abs() < 1e-9);
        assert!((hit.h - map_h * 0.34).abs() < 1e-9);

        // Resizing recomputes, not interpolates
        let mut app = test_app();
        let before = app.hitbox;
        app.resize(200, 100);
        assert_ne!(app.hitbox, before);
        assert_eq!(app.hitbox, Hitbox::for_frame(200.0, 100.0));
    }

    #[test]
    fn test_outside_click_is_a_noop() {
        let mut app = test_app();
        let breadcrumb_before = app.dashboard.breadcrumb.clone();

        // A point at the frame origin is well outside the hitbox
        assert_eq!(app.pointer_down(0.0, 0.0), None);
        assert_eq!(app.view, View::National);
        assert_eq!(app.dashboard.breadcrumb, breadcrumb_before);
        // Gate untouched: a later transition to Regional still fetches
        assert!(app.news_gate.should_fetch(View::Regional));
    }

    #[test]
    fn test_inside_click_drills_in_and_fetches_once() {
        let mut app = test_app();
        assert_eq!(app.startup_fetch(), Some(View::National));

        let (cx, cy) = (
            app.hitbox.x + app.hitbox.w / 2.0,
            app.hitbox.y + app.hitbox.h / 2.0,
        );
        assert_eq!(app.pointer_down(cx, cy), Some(View::Regional));
        assert_eq!(app.view, View::Regional);
        assert!(app.dashboard.breadcrumb.contains("Alameda"));
        // Marked immediately, so the same view does not refetch
        assert!(!app.news_gate.should_fetch(View::Regional));
    }

    #[test]
    fn test_regional_click_anywhere_returns_to_national() {
        let mut app = test_app();
        app.startup_fetch();
        let (cx, cy) = (app.hitbox.x, app.hitbox.y);
        app.pointer_down(cx, cy);
        assert_eq!(app.view, View::Regional);

        // Far outside the hitbox; the return trip needs no hit test
        assert_eq!(app.pointer_down(0.0, 0.0), Some(View::National));
        assert_eq!(app.view, View::National);
        assert!(app.dashboard.breadcrumb.contains("California focus"));
    }

    #[test]
    fn test_stale_news_results_are_discarded() {
        let mut app = test_app();
        app.startup_fetch();

        // A result tagged for the regional view arrives while national is active
        app.apply_news(NewsUpdate {
            view: View::Regional,
            result: Ok(vec![Headline {
                title: "stale".into(),
                url: "u".into(),
                published_at: "p".into(),
                source_name: "s".into(),
            }]),
        });
        assert!(app.news.headlines.is_empty());

        // The matching tag applies
        app.apply_news(NewsUpdate {
            view: View::National,
            result: Ok(vec![Headline {
                title: "fresh".into(),
                url: "u".into(),
                published_at: "p".into(),
                source_name: "s".into(),
            }]),
        });
        assert_eq!(app.news.headlines.len(), 1);
        assert_eq!(app.news.headlines[0].title, "fresh");
    }

    #[test]
    fn test_active_stats_follow_view() {
        let mut app = test_app();
        assert_eq!(
            app.active_stats().map(|s| s.label.as_str()),
            Some("California 2024")
        );

        let (cx, cy) = (app.hitbox.x, app.hitbox.y);
        app.pointer_down(cx, cy);
        assert_eq!(
            app.active_stats().map(|s| s.label.as_str()),
            Some("Alameda County 2024")
        );
    }

    #[test]
    fn test_hover_requires_national_view() {
        let mut app = test_app();
        let (cx, cy) = (app.hitbox.x + 1.0, app.hitbox.y + 1.0);
        app.set_mouse_pos(cx as u16, cy as u16);
        assert!(app.hovering_hitbox());

        app.pointer_down(cx, cy);
        assert_eq!(app.view, View::Regional);
        assert!(!app.hovering_hitbox());
    }
}
