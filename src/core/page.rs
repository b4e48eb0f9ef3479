use super::constants::{
    CURSOR_FOLLOW_EASE, MOBILE_BREAKPOINT_PX, NAV_ACTIVE_OFFSET_PX, NAV_SCROLL_OFFSET_PX,
    PARALLAX_SPEED,
};

// Decision logic for the page interactions; the DOM wiring lives in `ui/`.

/// Id of the last section whose top (less the activation offset) has been scrolled past.
pub fn active_section<'a, I>(scroll_y: f64, sections: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut current = None;
    for (id, offset_top) in sections {
        if scroll_y >= offset_top - NAV_ACTIVE_OFFSET_PX {
            current = Some(id);
        }
    }
    current
}

/// A link counts as active when its href mentions the section id.
#[inline]
pub fn link_is_active(href: &str, current: Option<&str>) -> bool {
    match current {
        Some(id) => href.contains(id),
        // Nothing scrolled past yet: every href contains the empty id
        None => true,
    }
}

#[inline]
pub fn scroll_target_for(offset_top: f64) -> f64 {
    offset_top - NAV_SCROLL_OFFSET_PX
}

#[inline]
pub fn parallax_offset(scroll_y: f64) -> f64 {
    scroll_y * PARALLAX_SPEED
}

#[inline]
pub fn is_mobile_width(inner_width: f64) -> bool {
    inner_width <= MOBILE_BREAKPOINT_PX
}

/// Left offset of the slide-in nav after a toggle.
#[inline]
pub fn toggled_menu_left(current: &str) -> &'static str {
    if current == "0px" {
        "-100%"
    } else {
        "0px"
    }
}

/// `data-skill` attribute to a CSS width; non-numeric values are clamped to 0.
pub fn skill_width(data_skill: &str) -> String {
    let pct = data_skill
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);
    format!("{}%", pct)
}

/// Two-point cursor: the dot jumps, the follower eases.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CursorTrail {
    pub cursor: [f64; 2],
    pub follower: [f64; 2],
}

impl CursorTrail {
    pub fn point_at(&mut self, x: f64, y: f64) {
        self.cursor = [x, y];
    }

    pub fn step(&mut self) {
        for i in 0..2 {
            self.follower[i] += (self.cursor[i] - self.follower[i]) * CURSOR_FOLLOW_EASE;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Sending,
    Sent,
}

impl SubmitPhase {
    /// A new submission is only accepted while idle.
    pub fn submit(self) -> Option<SubmitPhase> {
        match self {
            SubmitPhase::Idle => Some(SubmitPhase::Sending),
            _ => None,
        }
    }

    /// Advance when the phase timer elapses.
    pub fn elapse(self) -> SubmitPhase {
        match self {
            SubmitPhase::Idle => SubmitPhase::Idle,
            SubmitPhase::Sending => SubmitPhase::Sent,
            SubmitPhase::Sent => SubmitPhase::Idle,
        }
    }

    pub fn button_html(self) -> Option<&'static str> {
        match self {
            SubmitPhase::Idle => None,
            SubmitPhase::Sending => {
                Some("<span>Sending...</span><i class=\"fas fa-spinner fa-spin\"></i>")
            }
            SubmitPhase::Sent => Some("<span>Message Sent!</span><i class=\"fas fa-check\"></i>"),
        }
    }

    pub fn button_disabled(self) -> bool {
        self != SubmitPhase::Idle
    }
}

/// The contact form's fields as logged on submit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
