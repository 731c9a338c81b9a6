// Navigation controller: scrolled bar state, mobile menu, hero fade.
// Class membership on the elements is the only state; commands are recomputed from events.

use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Element, KeyboardEvent, Node};

use crate::dom::{self, Disposer};
use crate::page::Page;
use crate::scroll_dispatch::ScrollDispatcher;
use crate::types::{NavigationSettings, CLASS_ACTIVE, CLASS_SCROLLED};

/// The bar is scrolled strictly past the threshold.
pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Hero opacity for a scroll offset: full until the fade start, then easing toward the floor.
pub fn hero_opacity(scroll_y: f64, settings: &NavigationSettings) -> f64 {
    if scroll_y > settings.hero_fade_start {
        let faded = 1.0 - scroll_y / settings.hero_fade_distance;
        faded.max(settings.hero_min_opacity)
    } else {
        1.0
    }
}

/// What an event asks the mobile menu to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Toggle,
    Close,
}

impl MenuCommand {
    /// Menu open state after applying this command to `open`.
    pub fn apply(self, open: bool) -> bool {
        match self {
            MenuCommand::Toggle => !open,
            MenuCommand::Close => false,
        }
    }
}

/// A document click closes the menu unless it landed inside the toggle or the menu.
pub fn command_for_click(inside_toggle: bool, inside_menu: bool) -> Option<MenuCommand> {
    if inside_toggle || inside_menu {
        None
    } else {
        Some(MenuCommand::Close)
    }
}

pub fn command_for_key(key: &str) -> Option<MenuCommand> {
    (key == "Escape").then_some(MenuCommand::Close)
}

/// The toggle button and the menu it controls. Either may be missing from the markup.
#[derive(Clone)]
pub struct Menu {
    toggle: Option<Element>,
    menu: Option<Element>,
}

impl Menu {
    pub fn new(toggle: Option<Element>, menu: Option<Element>) -> Self {
        Menu { toggle, menu }
    }

    /// Open state lives on the menu; a lone toggle carries it itself.
    pub fn is_open(&self) -> bool {
        self.menu
            .as_ref()
            .or(self.toggle.as_ref())
            .map(|element| dom::has_class(element, CLASS_ACTIVE))
            .unwrap_or(false)
    }

    pub fn apply(&self, command: MenuCommand) {
        let open = command.apply(self.is_open());
        for element in self.toggle.iter().chain(self.menu.iter()) {
            dom::set_class(element, CLASS_ACTIVE, open);
        }
    }

    fn contains(&self, target: Option<&Node>) -> (bool, bool) {
        let inside = |el: &Option<Element>| el.as_ref().map(|el| el.contains(target)).unwrap_or(false);
        (inside(&self.toggle), inside(&self.menu))
    }
}

/// Install the navigation controller.
pub fn install(page: &Page, scroll: &ScrollDispatcher) -> Disposer {
    let selectors = &page.config.selectors;
    let settings = page.config.navigation.clone();
    let mut disposer = Disposer::new("navigation");

    let navbar = page.query(&selectors.navbar);
    match &navbar {
        Some(navbar) => {
            let navbar = navbar.clone();
            let threshold = settings.scrolled_threshold;
            scroll.subscribe(move |scroll_y| {
                dom::set_class(&navbar, CLASS_SCROLLED, is_scrolled(scroll_y, threshold));
            });
        }
        None => tracing::debug!(selector = %selectors.navbar, "no navigation bar"),
    }

    if let (Some(hero), Some(_)) = (page.query(&selectors.hero), &navbar) {
        scroll.subscribe(move |scroll_y| {
            let opacity = hero_opacity(scroll_y, &settings);
            dom::set_style(&hero, "opacity", &opacity.to_string());
        });
    }

    let toggle = page.query(&selectors.nav_toggle);
    let menu_el = page.query(&selectors.nav_menu);
    let both_present = toggle.is_some() && menu_el.is_some();
    let menu = Rc::new(Menu::new(toggle.clone(), menu_el));

    if let Some(toggle) = &toggle {
        let menu = Rc::clone(&menu);
        disposer.listen(EventListener::new(toggle, "click", move |_| {
            menu.apply(MenuCommand::Toggle);
        }));
    }

    for link in page.query_all(&selectors.nav_link) {
        let menu = Rc::clone(&menu);
        disposer.listen(EventListener::new(&link, "click", move |_| {
            menu.apply(MenuCommand::Close);
        }));
    }

    if both_present {
        let outside = Rc::clone(&menu);
        disposer.listen(EventListener::new(&page.document, "click", move |event| {
            let target = event.target();
            let node = target.as_ref().and_then(|t| t.dyn_ref::<Node>());
            let (in_toggle, in_menu) = outside.contains(node);
            if let Some(command) = command_for_click(in_toggle, in_menu) {
                outside.apply(command);
            }
        }));

        let escape = Rc::clone(&menu);
        disposer.listen(EventListener::new(&page.document, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if let Some(command) = command_for_key(&event.key()) {
                escape.apply(command);
            }
        }));
    } else {
        tracing::debug!("mobile menu markup incomplete, outside-click and Escape closing disabled");
    }

    disposer
}
