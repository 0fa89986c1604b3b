//! Font size tool engine
//!
//! [`FontSizeTool`] ties the pieces together for one tool instance: it owns
//! the config, the last inspected [`SelectionState`], the toolbar button and
//! at most one open [`SizeMenu`]. It is generic over the document backend so
//! the same engine runs in the browser and against the in-memory document.

pub mod button;
pub mod inspector;
pub mod menu;
pub mod styles;
pub mod transformer;

pub use inspector::inspect;
pub use menu::SizeMenu;
pub use transformer::{apply, strip_markers, Applied};

use crate::dom::{Dom, MenuEvent};
use crate::error::DomResult;
use crate::models::{SelectionState, SizeChoice, ToolConfig};

pub struct FontSizeTool<D: Dom> {
    config: ToolConfig,
    state: SelectionState,
    button: Option<D::Node>,
    menu: SizeMenu<D>,
}

impl<D: Dom> FontSizeTool<D> {
    /// Create a tool for `config`, repairing it where needed, and make sure
    /// the shared stylesheet is present.
    pub fn new(dom: &mut D, mut config: ToolConfig) -> Self {
        for warning in config.validate() {
            log::warn!("font size config: {}", warning);
        }
        if let Err(err) = styles::inject(dom) {
            log::warn!("could not inject font size styles: {}", err);
        }
        Self {
            config,
            state: SelectionState::none(),
            button: None,
            menu: SizeMenu::Closed,
        }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn button(&self) -> Option<&D::Node> {
        self.button.as_ref()
    }

    pub fn menu(&self) -> &SizeMenu<D> {
        &self.menu
    }

    /// The toolbar button, created on first call
    pub fn render(&mut self, dom: &mut D) -> DomResult<D::Node> {
        if let Some(button) = &self.button {
            return Ok(button.clone());
        }
        let button = button::render(dom)?;
        button::refresh(dom, &button, &self.state)?;
        self.button = Some(button.clone());
        Ok(button)
    }

    /// Inspect the selection anchored at `anchor` and sync the button.
    /// Returns whether a size is in effect.
    pub fn check_state(&mut self, dom: &mut D, anchor: Option<&D::Node>) -> bool {
        self.state = inspect(dom, anchor);
        if let Err(err) = self.refresh_button(dom) {
            log::warn!("could not update font size button: {}", err);
        }
        self.state.has_size
    }

    /// Button click: show the size menu for `range`. Never applies anything
    /// directly. Returns whether a menu was opened.
    pub fn surround(&mut self, dom: &mut D, range: D::Range) -> DomResult<bool> {
        self.close_menu(dom);

        if dom.selection_text().is_empty() {
            log::debug!("font size menu not opened: nothing selected");
            return Ok(false);
        }

        let anchor = match &self.button {
            Some(button) => dom.bounding_rect(button),
            None => Default::default(),
        };
        let element = menu::build(dom, &self.config, &self.state, anchor)?;
        self.menu.open(dom, element, range)?;
        log::debug!("font size menu opened");
        Ok(true)
    }

    /// Menu pick: close the menu and apply `choice` to the range it was
    /// opened for. Returns whether the document changed.
    pub fn choose(&mut self, dom: &mut D, choice: &SizeChoice) -> DomResult<bool> {
        let Some(mut range) = self.menu.close(dom) else {
            return Ok(false);
        };
        self.apply(dom, &mut range, choice)
    }

    /// Apply `choice` to `range` and record the resulting state
    pub fn apply(&mut self, dom: &mut D, range: &mut D::Range, choice: &SizeChoice) -> DomResult<bool> {
        match apply(dom, range, choice)? {
            Some(applied) => {
                log::debug!("font size applied: {:?}", choice);
                self.state = applied.state;
                self.refresh_button(dom)?;
                Ok(true)
            }
            None => {
                log::debug!("font size not applied: selection has no text");
                Ok(false)
            }
        }
    }

    pub fn handle_menu_event(&mut self, dom: &mut D, event: MenuEvent<D::Node>) -> DomResult<()> {
        match event {
            MenuEvent::Click { target } => {
                let choice = target.and_then(|target| self.menu.choice_at(dom, &target));
                if let Some(choice) = choice {
                    self.choose(dom, &choice)?;
                }
            }
            MenuEvent::PointerDown { target, time } => {
                if self.menu.dismisses(dom, target.as_ref(), self.button.as_ref(), time) {
                    log::debug!("font size menu dismissed");
                    self.close_menu(dom);
                }
            }
        }
        Ok(())
    }

    /// Returns whether a menu was open
    pub fn close_menu(&mut self, dom: &mut D) -> bool {
        self.menu.close(dom).is_some()
    }

    /// Tear down: the menu and its listeners go, the stylesheet stays
    pub fn destroy(&mut self, dom: &mut D) {
        self.close_menu(dom);
        self.state = SelectionState::none();
    }

    fn refresh_button(&self, dom: &mut D) -> DomResult<()> {
        match &self.button {
            Some(button) => button::refresh(dom, button, &self.state),
            None => Ok(()),
        }
    }
}
