// DOM contract between the page markup and the wasm front-end: ids, selectors
// and class names the page is expected to provide.

// Background scene
pub const CANVAS_ID: &str = "three-canvas";
pub const FALLBACK_BACKGROUND: &str =
    "radial-gradient(circle at center, rgba(212, 175, 55, 0.1), transparent)";
pub const CONTEXT_LOST_EVENT: &str = "webglcontextlost";
pub const CONTEXT_RESTORED_EVENT: &str = "webglcontextrestored";

// Theme
pub const THEME_TOGGLE_ID: &str = "themeToggle";
pub const THEME_ICON_SELECTOR: &str = "#themeToggle i";
pub const THEME_ATTRIBUTE: &str = "data-theme";

// Cursor
pub const CURSOR_SELECTOR: &str = ".cursor";
pub const CURSOR_FOLLOWER_SELECTOR: &str = ".cursor-follower";

// Navigation
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const SECTION_SELECTOR: &str = ".section";
pub const MENU_TOGGLE_SELECTOR: &str = ".menu-toggle";
pub const NAV_LINKS_SELECTOR: &str = ".nav-links";
pub const ACTIVE_CLASS: &str = "active";

// Scroll reveal
pub const REVEAL_SELECTOR: &str = "[data-aos]";
pub const REVEAL_CLASS: &str = "aos-animate";
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -100px 0px";
pub const SKILL_BAR_CLASS: &str = "skill-bar";
pub const SKILL_FILL_SELECTOR: &str = ".skill-fill";

// Tabs and cards
pub const TAB_SELECTOR: &str = ".portfolio-tab";
pub const TAB_CONTENT_SELECTOR: &str = ".tab-content";
pub const PROJECT_CARD_SELECTOR: &str = ".project-card";

// Contact form
pub const CONTACT_FORM_ID: &str = "contactForm";
pub const SUBMIT_BUTTON_SELECTOR: &str = ".btn-submit";

// Parallax
pub const PARALLAX_SELECTOR: &str = ".home-content";
