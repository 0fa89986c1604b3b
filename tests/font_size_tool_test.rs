// End-to-end behaviour of the font size tool on the in-memory document

use font_size_tool_wasm::dom::memory::{sanitize, BoundaryPoint, Document, NodeId, Range};
use font_size_tool_wasm::dom::{Dom, MenuEvent};
use font_size_tool_wasm::models::{SanitizeConfig, MARKER_CLASS};
use font_size_tool_wasm::tool::menu::{DROPDOWN_CLASS, MENU_GRACE_MS, SIZE_ATTRIBUTE};
use font_size_tool_wasm::{FontSizeTool, SelectionState, SizeChoice, ToolConfig};

/// A document with one block holding `markup`, and a tool with its button rendered
fn editor(markup: &str) -> (Document, NodeId, FontSizeTool<Document>, NodeId) {
    let mut doc = Document::new();
    let block = doc.create_element("div");
    let body = doc.body_id();
    doc.append(body, block).unwrap();
    doc.append_markup(block, markup).unwrap();

    let mut tool = FontSizeTool::new(&mut doc, ToolConfig::default());
    let button = tool.render(&mut doc).unwrap();
    doc.append(body, button).unwrap();
    (doc, block, tool, button)
}

fn text_node(doc: &Document, needle: &str) -> NodeId {
    doc.descendants(doc.root())
        .into_iter()
        .find(|&n| doc.text(n) == Some(needle))
        .unwrap_or_else(|| panic!("no text node {:?}", needle))
}

fn wrappers(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.find_elements(root, |el| el.classes.contains(MARKER_CLASS))
}

fn open_menus(doc: &Document) -> Vec<NodeId> {
    doc.find_elements(doc.body_id(), |el| el.classes.contains(DROPDOWN_CLASS))
}

fn option_label(doc: &Document, menu: NodeId, size: &str) -> NodeId {
    let option = doc.find_elements(menu, |el| el.attribute(SIZE_ATTRIBUTE) == Some(size))[0];
    doc.children(option)[0]
}

#[test]
fn test_hello_scenario_through_the_menu() {
    let (mut doc, block, mut tool, button) = editor("Say Hello world");
    let text = text_node(&doc, "Say Hello world");
    let range = doc.select_text(text, 4, 9);

    assert_eq!(tool.surround(&mut doc, range), Ok(true));
    let menu = open_menus(&doc)[0];
    let label = option_label(&doc, menu, "20px");

    tool.handle_menu_event(&mut doc, MenuEvent::Click { target: Some(label) })
        .unwrap();

    assert_eq!(
        doc.inner_html(block),
        r#"Say <span class="font-size-tool" style="font-size: 20px;">Hello</span> world"#
    );
    let span = wrappers(&doc, block)[0];
    assert_eq!(doc.text_content(span), "Hello");

    // caret right after the span, outside it
    let caret = doc.selection().unwrap();
    assert!(caret.is_collapsed());
    assert_eq!(caret.start, BoundaryPoint::new(block, 2));

    assert_eq!(tool.state(), &SelectionState::sized("20px"));
    assert_eq!(doc.element(button).unwrap().attribute("title"), Some("Font Size: 20px"));

    // menu and listeners are gone
    assert!(open_menus(&doc).is_empty());
    assert!(!tool.menu().is_open());
    assert_eq!(doc.active_subscriptions(), 0);
}

#[test]
fn test_same_size_twice_gives_one_wrapper() {
    let (mut doc, block, mut tool, _) = editor("Say Hello world");
    let text = text_node(&doc, "Say Hello world");
    let mut range = doc.select_text(text, 4, 9);
    assert_eq!(tool.apply(&mut doc, &mut range, &SizeChoice::size("20px")), Ok(true));

    let hello = text_node(&doc, "Hello");
    let mut range = doc.select_text(hello, 0, 5);
    assert_eq!(tool.apply(&mut doc, &mut range, &SizeChoice::size("20px")), Ok(true));

    assert_eq!(
        doc.inner_html(block),
        r#"Say <span class="font-size-tool" style="font-size: 20px;">Hello</span> world"#
    );
    let spans = wrappers(&doc, block);
    assert_eq!(spans.len(), 1);
    assert!(wrappers(&doc, spans[0]).iter().all(|&w| w == spans[0]));
}

#[test]
fn test_reapplying_replaces_the_size() {
    let (mut doc, block, mut tool, _) = editor("Say Hello world");
    let text = text_node(&doc, "Say Hello world");
    let mut range = doc.select_text(text, 4, 9);
    tool.apply(&mut doc, &mut range, &SizeChoice::size("20px")).unwrap();

    // reselect the whole wrapper from the block
    let mut range = Range::new(BoundaryPoint::new(block, 1), BoundaryPoint::new(block, 2));
    doc.set_selection(Some(range));
    tool.apply(&mut doc, &mut range, &SizeChoice::size("24px")).unwrap();

    let html = doc.inner_html(block);
    assert_eq!(
        html,
        r#"Say <span class="font-size-tool" style="font-size: 24px;">Hello</span> world"#
    );
    assert!(!html.contains("20px"));
    assert_eq!(tool.state(), &SelectionState::sized("24px"));
}

#[test]
fn test_inspector_follows_the_selection() {
    let (mut doc, _, mut tool, button) =
        editor(r#"plain <span class="font-size-tool" style="font-size: 18px">styled</span>"#);
    let styled = text_node(&doc, "styled");
    let plain = text_node(&doc, "plain ");

    assert!(tool.check_state(&mut doc, Some(&styled)));
    assert_eq!(tool.state(), &SelectionState::sized("18px"));
    assert!(doc.element(button).unwrap().classes.contains("ce-inline-tool--active"));

    assert!(!tool.check_state(&mut doc, Some(&plain)));
    assert_eq!(tool.state(), &SelectionState::none());
    assert!(!doc.element(button).unwrap().classes.contains("ce-inline-tool--active"));
}

#[test]
fn test_empty_selection_changes_nothing() {
    let (mut doc, block, mut tool, _) = editor("Hello");
    let text = text_node(&doc, "Hello");
    let before = doc.inner_html(block);
    let mut range = doc.select_text(text, 2, 2);

    assert_eq!(tool.surround(&mut doc, range), Ok(false));
    assert!(open_menus(&doc).is_empty());

    assert_eq!(tool.apply(&mut doc, &mut range, &SizeChoice::size("20px")), Ok(false));
    assert_eq!(doc.inner_html(block), before);
    assert_eq!(doc.children(block), &[text]);
    assert_eq!(tool.state(), &SelectionState::none());
}

#[test]
fn test_clean_wrappers_are_unwrapped_in_order() {
    let (mut doc, block, mut tool, _) =
        editor(r#"x<span class="font-size-tool" style="font-size: 12px">yy</span>z"#);
    let mut range = doc.select_node_contents(block);

    assert_eq!(tool.apply(&mut doc, &mut range, &SizeChoice::Clear), Ok(true));

    assert_eq!(doc.inner_html(block), "xyyz");
    let texts: Vec<_> = doc
        .children(block)
        .iter()
        .map(|&n| doc.text(n).unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["x", "yy", "z"]);
    assert_eq!(doc.selection().unwrap().start, BoundaryPoint::new(block, 3));
}

#[test]
fn test_wrapper_with_other_styling_survives_a_clear() {
    let (mut doc, block, mut tool, _) =
        editor(r#"<span class="font-size-tool" style="font-size: 12px; color: red">red</span>"#);
    let mut range = doc.select_node_contents(block);

    tool.apply(&mut doc, &mut range, &SizeChoice::Clear).unwrap();

    assert_eq!(doc.inner_html(block), r#"<span style="color: red;">red</span>"#);
}

#[test]
fn test_opening_twice_keeps_one_menu() {
    let (mut doc, _, mut tool, _) = editor("Hello");
    let text = text_node(&doc, "Hello");
    let range = doc.select_text(text, 0, 5);

    assert_eq!(tool.surround(&mut doc, range), Ok(true));
    assert_eq!(tool.surround(&mut doc, range), Ok(true));

    assert_eq!(open_menus(&doc).len(), 1);
    assert_eq!(doc.active_subscriptions(), 1);
}

#[test]
fn test_outside_pointer_down_closes_after_grace() {
    let (mut doc, block, mut tool, button) = editor("Hello");
    let text = text_node(&doc, "Hello");
    let range = doc.select_text(text, 0, 5);
    tool.surround(&mut doc, range).unwrap();

    // the opening gesture itself
    let now = doc.now();
    tool.handle_menu_event(&mut doc, MenuEvent::PointerDown { target: Some(block), time: now })
        .unwrap();
    assert!(tool.menu().is_open());

    doc.advance(MENU_GRACE_MS + 1.0);
    let now = doc.now();
    tool.handle_menu_event(&mut doc, MenuEvent::PointerDown { target: Some(button), time: now })
        .unwrap();
    assert!(tool.menu().is_open());

    let menu = open_menus(&doc)[0];
    tool.handle_menu_event(&mut doc, MenuEvent::PointerDown { target: Some(menu), time: now })
        .unwrap();
    assert!(tool.menu().is_open());

    tool.handle_menu_event(&mut doc, MenuEvent::PointerDown { target: Some(block), time: now })
        .unwrap();
    assert!(!tool.menu().is_open());
    assert!(open_menus(&doc).is_empty());
    assert_eq!(doc.active_subscriptions(), 0);
    assert_eq!(doc.inner_html(block), "Hello");
}

#[test]
fn test_clear_option_from_the_menu() {
    let (mut doc, block, mut tool, _) =
        editor(r#"<span class="font-size-tool" style="font-size: 18px">big</span> text"#);
    let big = text_node(&doc, "big");
    tool.check_state(&mut doc, Some(&big));
    let range = doc.select_text(big, 0, 3);
    tool.surround(&mut doc, range).unwrap();

    let menu = open_menus(&doc)[0];
    let active = doc.find_elements(menu, |el| el.classes.contains("font-size-option--active"));
    assert_eq!(doc.element(active[0]).unwrap().attribute(SIZE_ATTRIBUTE), Some("18px"));

    let clear = doc.find_elements(menu, |el| el.attribute("data-clear").is_some())[0];
    tool.handle_menu_event(&mut doc, MenuEvent::Click { target: Some(clear) })
        .unwrap();

    assert_eq!(doc.inner_html(block), "big text");
    assert_eq!(tool.state(), &SelectionState::none());
}

#[test]
fn test_destroy_releases_the_menu() {
    let (mut doc, _, mut tool, _) = editor("Hello");
    let text = text_node(&doc, "Hello");
    let range = doc.select_text(text, 0, 5);
    tool.surround(&mut doc, range).unwrap();

    tool.destroy(&mut doc);

    assert!(open_menus(&doc).is_empty());
    assert_eq!(doc.active_subscriptions(), 0);
    // the shared stylesheet stays
    assert!(doc.get_element_by_id("font-size-tool-styles").is_some());
}

#[test]
fn test_applied_markup_survives_sanitize() {
    let (mut doc, block, mut tool, _) = editor("Say Hello world");
    let text = text_node(&doc, "Say Hello world");
    let mut range = doc.select_text(text, 4, 9);
    tool.apply(&mut doc, &mut range, &SizeChoice::size("20px")).unwrap();

    let saved = doc.inner_html(block);
    let mut reloaded = Document::new();
    let body = reloaded.body_id();
    reloaded.append_markup(body, &saved).unwrap();
    sanitize(&mut reloaded, body, &SanitizeConfig::default()).unwrap();

    assert_eq!(reloaded.inner_html(body), saved);
}
