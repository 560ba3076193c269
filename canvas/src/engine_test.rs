#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{CameraKind, SegmentKind};
use crate::geom::Corner;

// =============================================================
// Helpers
// =============================================================

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn ctrl_modifier() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn key(name: &str) -> Key {
    Key(name.to_owned())
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_object_created(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::ObjectCreated(_)))
}

fn has_history_changed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::HistoryChanged))
}

/// Add `obj` to the active layer as one history entry and return its id.
fn add(core: &mut EngineCore, obj: SceneObject) -> ObjectId {
    let id = obj.id.clone();
    core.history.record_update(|p| {
        p.active_floor_mut().unwrap().add_object(obj).unwrap();
    });
    id
}

fn object(core: &EngineCore, id: &str) -> SceneObject {
    core.project().find_object(id).unwrap().clone()
}

fn press(core: &mut EngineCore, at: Point) -> Vec<Action> {
    core.on_pointer_down(at, Button::Primary, no_modifiers())
}

fn release(core: &mut EngineCore, at: Point) -> Vec<Action> {
    core.on_pointer_up(at, Button::Primary, no_modifiers())
}

fn click(core: &mut EngineCore, at: Point) {
    press(core, at);
    release(core, at);
}

fn drag(core: &mut EngineCore, from: Point, to: Point) {
    press(core, from);
    core.on_pointer_move(to, no_modifiers());
    release(core, to);
}

// =============================================================
// EngineCore: construction and defaults
// =============================================================

#[test]
fn core_default_tool_is_select() {
    let core = EngineCore::new();
    assert_eq!(core.ui.tool, Tool::Select);
    assert!(core.selection().is_none());
}

#[test]
fn core_default_project_has_one_floor() {
    let core = EngineCore::new();
    assert_eq!(core.project().floors.len(), 1);
    assert_eq!(core.history.len(), 1);
}

#[test]
fn core_default_viewport_is_identity() {
    let core = EngineCore::new();
    assert_eq!(core.viewport, Viewport::default());
    assert_eq!(core.viewport_width, 0.0);
    assert_eq!(core.dpr, 1.0);
}

// =============================================================
// Placement tools
// =============================================================

#[test]
fn camera_tool_places_selects_and_reverts() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::BulletCam);
    let actions = press(&mut core, pt(100.0, 80.0));

    assert!(has_object_created(&actions));
    assert!(has_action(&actions, |a| *a == Action::ToolChanged(Tool::Select)));
    assert_eq!(core.ui.tool, Tool::Select);
    assert_eq!(core.history.len(), 2);

    let cam = core.selected_object().unwrap().as_camera().copied().unwrap();
    assert_eq!(cam.position(), pt(100.0, 80.0));
    assert_eq!(cam.kind, CameraKind::Bullet);
    assert_eq!(cam.range, 100.0);
    assert_eq!(cam.fov, 90.0);
    assert_eq!(cam.rotation, -std::f64::consts::FRAC_PI_2);
}

#[test]
fn camera_lands_on_active_layer() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::DomeCam);
    press(&mut core, pt(0.0, 0.0));
    let floor = core.active_floor().unwrap();
    assert_eq!(floor.active_layer().unwrap().objects.len(), 1);
    assert!(floor.layers[0].objects.is_empty());
}

#[test]
fn text_tool_requests_content() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    let actions = press(&mut core, pt(5.0, 5.0));
    let id = core.selection().unwrap().to_owned();
    assert!(has_action(&actions, |a| *a == Action::EditTextRequested { id: id.clone(), text: "Text".into() }));

    let actions = core.set_text_content("Lobby");
    assert!(has_history_changed(&actions));
    assert_eq!(object(&core, &id).as_text().unwrap().content, "Lobby");
}

#[test]
fn tool_switch_by_toolbar_name() {
    let mut core = EngineCore::new();
    let actions = core.set_tool_named("movePdf");
    assert!(has_action(&actions, |a| *a == Action::ToolChanged(Tool::MoveBackground)));
    assert_eq!(core.ui.tool, Tool::MoveBackground);

    core.set_tool_named("domeCam");
    assert_eq!(core.ui.tool, Tool::DomeCam);
}

#[test]
fn unknown_tool_name_is_ignored() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rect);
    assert!(core.set_tool_named("lasso").is_empty());
    assert_eq!(core.ui.tool, Tool::Rect);
}

// =============================================================
// Drawing tools
// =============================================================

#[test]
fn rect_drawn_is_normalized_on_commit() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rect);
    press(&mut core, pt(10.0, 10.0));
    core.on_pointer_move(pt(40.0, -20.0), no_modifiers());

    assert_eq!(core.preview(), Some(Shape::Rect(RectShape { x: 10.0, y: 10.0, w: 30.0, h: -30.0 })));

    let actions = release(&mut core, pt(40.0, -20.0));
    assert!(has_object_created(&actions));
    assert!(core.preview().is_none());
    let layer = core.active_floor().unwrap().active_layer().unwrap();
    assert_eq!(layer.objects[0].as_rect(), Some(&RectShape { x: 10.0, y: -20.0, w: 30.0, h: 30.0 }));
}

#[test]
fn tiny_rect_is_discarded() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rect);
    drag(&mut core, pt(0.0, 0.0), pt(3.0, -4.0));
    assert_eq!(core.history.len(), 1);
}

#[test]
fn thin_rect_passes_threshold_on_one_axis() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rect);
    drag(&mut core, pt(0.0, 0.0), pt(6.0, 0.0));
    assert_eq!(core.history.len(), 2);
}

#[test]
fn wall_and_wiring_segments() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Wall);
    drag(&mut core, pt(0.0, 0.0), pt(30.0, 40.0));
    core.set_tool(Tool::Wiring);
    drag(&mut core, pt(0.0, 0.0), pt(3.0, 3.0));
    drag(&mut core, pt(0.0, 0.0), pt(0.0, 100.0));

    let layer = core.active_floor().unwrap().active_layer().unwrap();
    let kinds: Vec<_> = layer.objects.iter().map(|o| o.as_segment().unwrap().kind).collect();
    assert_eq!(kinds, vec![SegmentKind::Wall, SegmentKind::Wiring]);
    assert_eq!(core.wiring_meters(), 2.0);
}

#[test]
fn drawing_tool_keeps_tool_after_commit() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Wall);
    drag(&mut core, pt(0.0, 0.0), pt(50.0, 0.0));
    assert_eq!(core.ui.tool, Tool::Wall);
}

#[test]
fn pointer_leave_commits_drawing() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Wall);
    press(&mut core, pt(0.0, 0.0));
    core.on_pointer_move(pt(50.0, 0.0), no_modifiers());
    let actions = core.on_pointer_leave(pt(60.0, 0.0));
    assert!(has_object_created(&actions));
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn escape_cancels_drawing() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rect);
    press(&mut core, pt(0.0, 0.0));
    core.on_pointer_move(pt(50.0, 50.0), no_modifiers());
    core.on_key_down(&key("Escape"), no_modifiers());
    release(&mut core, pt(50.0, 50.0));
    assert_eq!(core.ui.tool, Tool::Select);
    assert_eq!(core.history.len(), 1);
}

// =============================================================
// Select tool: hit-testing
// =============================================================

#[test]
fn later_object_wins_overlap() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    let seg = add(&mut core, SceneObject::segment(pt(0.0, 10.0), pt(20.0, 10.0), SegmentKind::Wall));
    click(&mut core, pt(10.0, 10.0));
    assert_eq!(core.selection(), Some(seg.as_str()));
}

#[test]
fn click_on_empty_space_clears_selection() {
    let mut core = EngineCore::new();
    let id = add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    click(&mut core, pt(10.0, 10.0));
    assert_eq!(core.selection(), Some(id.as_str()));

    let actions = press(&mut core, pt(500.0, 500.0));
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
}

#[test]
fn only_active_layer_is_hit() {
    let mut core = EngineCore::new();
    core.history.record_update(|p| {
        let floor = p.active_floor_mut().unwrap();
        let walls = floor.layers[0].id.clone();
        floor.layer_mut(&walls).unwrap().objects.push(SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    });
    click(&mut core, pt(10.0, 10.0));
    assert!(core.selection().is_none());
}

#[test]
fn hidden_active_layer_is_not_hit() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    let active = core.active_floor().unwrap().active_layer_id.clone();
    core.toggle_layer_visibility(&active).unwrap();
    click(&mut core, pt(10.0, 10.0));
    assert!(core.selection().is_none());
}

#[test]
fn press_without_move_records_nothing() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    click(&mut core, pt(10.0, 10.0));
    assert_eq!(core.history.len(), 2);
}

// =============================================================
// Select tool: drag / resize / rotate
// =============================================================

#[test]
fn drag_moves_from_gesture_start() {
    let mut core = EngineCore::new();
    let id = add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    press(&mut core, pt(5.0, 5.0));
    core.on_pointer_move(pt(15.0, 5.0), no_modifiers());
    core.on_pointer_move(pt(25.0, 15.0), no_modifiers());
    release(&mut core, pt(25.0, 15.0));
    assert_eq!(object(&core, &id).as_rect(), Some(&RectShape { x: 20.0, y: 10.0, w: 20.0, h: 20.0 }));
}

#[test]
fn drag_gesture_is_one_undo_step() {
    let mut core = EngineCore::new();
    let id = add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    let before = core.history.len();

    press(&mut core, pt(5.0, 5.0));
    let first = core.on_pointer_move(pt(6.0, 5.0), no_modifiers());
    let second = core.on_pointer_move(pt(7.0, 5.0), no_modifiers());
    core.on_pointer_move(pt(30.0, 5.0), no_modifiers());
    release(&mut core, pt(30.0, 5.0));

    assert!(has_history_changed(&first));
    assert!(!has_history_changed(&second));
    assert_eq!(core.history.len(), before + 1);

    core.undo();
    assert_eq!(object(&core, &id).as_rect().unwrap().x, 0.0);
}

#[test]
fn drag_segment_moves_both_endpoints() {
    let mut core = EngineCore::new();
    let id = add(&mut core, SceneObject::segment(pt(0.0, 0.0), pt(100.0, 0.0), SegmentKind::Wiring));
    drag(&mut core, pt(50.0, 2.0), pt(60.0, 12.0));
    let seg = object(&core, &id).as_segment().copied().unwrap();
    assert_eq!((seg.a(), seg.b()), (pt(10.0, 10.0), pt(110.0, 10.0)));
}

#[test]
fn resize_flips_then_normalizes_on_release() {
    let mut core = EngineCore::new();
    let id = add(&mut core, SceneObject::rect(0.0, 0.0, 100.0, 50.0));
    click(&mut core, pt(50.0, 25.0));
    let before = core.history.len();

    let actions = press(&mut core, pt(100.0, 50.0));
    assert!(matches!(core.input, InputState::Resizing { corner: Corner::BottomRight, .. }));
    assert!(has_action(&actions, |a| *a == Action::SetCursor(Cursor::NwseResize)));

    core.on_pointer_move(pt(-20.0, -10.0), no_modifiers());
    assert_eq!(object(&core, &id).as_rect(), Some(&RectShape { x: 0.0, y: 0.0, w: -20.0, h: -10.0 }));

    release(&mut core, pt(-20.0, -10.0));
    assert_eq!(object(&core, &id).as_rect(), Some(&RectShape { x: -20.0, y: -10.0, w: 20.0, h: 10.0 }));
    assert_eq!(core.history.len(), before + 1);
}

#[test]
fn resize_handles_are_screen_constant() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 100.0, 50.0));
    click(&mut core, pt(50.0, 25.0));
    core.viewport.scale = 4.0;

    // 1 world unit = 4 px: 6 world units away is outside the 8 px handle.
    press(&mut core, pt(4.0 * 106.0, 4.0 * 50.0));
    assert!(!matches!(core.input, InputState::Resizing { .. }));
}

#[test]
fn rotate_handle_turns_camera() {
    let mut core = EngineCore::new();
    let id = add(&mut core, SceneObject::camera(pt(0.0, 0.0), CameraKind::Bullet));
    click(&mut core, pt(0.0, 0.0));

    let actions = press(&mut core, pt(0.0, -30.0));
    assert!(matches!(core.input, InputState::Rotating { .. }));
    assert!(has_action(&actions, |a| *a == Action::SetCursor(Cursor::Alias)));

    core.on_pointer_move(pt(50.0, 0.0), no_modifiers());
    release(&mut core, pt(50.0, 0.0));
    assert_eq!(object(&core, &id).as_camera().unwrap().rotation, 0.0);
}

// =============================================================
// Panning and zoom
// =============================================================

#[test]
fn middle_button_pans_viewport() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Middle, no_modifiers());
    core.on_pointer_move(pt(10.0, 20.0), no_modifiers());
    core.on_pointer_move(pt(15.0, 20.0), no_modifiers());
    core.on_pointer_up(pt(15.0, 20.0), Button::Middle, no_modifiers());
    assert_eq!((core.viewport.offset_x, core.viewport.offset_y), (15.0, 20.0));
    assert_eq!(core.history.len(), 1);
}

#[test]
fn move_background_divides_by_scale() {
    let mut core = EngineCore::new();
    core.import_background(RasterizedPage { data: "img".into(), width: 10.0, height: 10.0 }).unwrap();
    let before = core.history.len();
    core.viewport.scale = 2.0;
    core.set_tool(Tool::MoveBackground);

    let actions = press(&mut core, pt(0.0, 0.0));
    assert!(has_action(&actions, |a| *a == Action::SetCursor(Cursor::Grabbing)));
    core.on_pointer_move(pt(10.0, 20.0), no_modifiers());
    core.on_pointer_move(pt(20.0, 40.0), no_modifiers());
    let actions = release(&mut core, pt(20.0, 40.0));

    let bg = core.active_floor().unwrap().background.clone().unwrap();
    assert_eq!((bg.x, bg.y), (10.0, 20.0));
    assert_eq!(core.history.len(), before + 1);
    assert_eq!(core.viewport.offset_x, 0.0);
    assert!(has_action(&actions, |a| *a == Action::SetCursor(Cursor::Grab)));
}

#[test]
fn move_background_without_background_is_noop() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::MoveBackground);
    drag(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    assert_eq!(core.history.len(), 1);
}

#[test]
fn wheel_zooms_by_direction() {
    let mut core = EngineCore::new();
    let actions = core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -1.0 }, no_modifiers());
    assert!(has_render_needed(&actions));
    assert!((core.viewport.scale - 1.1).abs() < 1e-12);

    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 1.0 }, no_modifiers());
    assert!((core.viewport.scale - 1.0).abs() < 1e-12);
}

#[test]
fn wheel_at_limit_requests_no_render() {
    let mut core = EngineCore::new();
    core.viewport.scale = 10.0;
    let actions = core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -1.0 }, no_modifiers());
    assert!(actions.is_empty());
}

#[test]
fn zoom_buttons_keep_center_fixed() {
    let mut core = EngineCore::new();
    core.set_viewport(800.0, 600.0, 2.0);
    let center = pt(400.0, 300.0);
    let before = core.viewport.screen_to_world(center);
    core.zoom_in();
    assert!((core.viewport.scale - 1.2).abs() < 1e-12);
    let after = core.viewport.screen_to_world(center);
    assert!(before.distance(after) < 1e-9);
}

#[test]
fn pinch_zooms_at_midpoint() {
    let mut core = EngineCore::new();
    core.on_touch_start(&[pt(0.0, 0.0), pt(100.0, 0.0)]);
    let actions = core.on_touch_move(&[pt(0.0, 0.0), pt(200.0, 0.0)]);
    assert!(has_render_needed(&actions));
    assert_eq!(core.viewport.scale, 2.0);
    assert_eq!(core.viewport.offset_x, -100.0);

    core.on_touch_end(1);
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn pinch_suppresses_pointer_pan() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Middle, no_modifiers());
    core.on_touch_start(&[pt(0.0, 0.0), pt(100.0, 0.0)]);
    core.on_pointer_move(pt(50.0, 50.0), no_modifiers());
    assert_eq!(core.viewport.offset_x, 0.0);
}

// =============================================================
// Keyboard and history
// =============================================================

#[test]
fn delete_key_removes_selected() {
    let mut core = EngineCore::new();
    let id = add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    click(&mut core, pt(10.0, 10.0));
    let actions = core.on_key_down(&key("Delete"), no_modifiers());
    assert!(has_action(&actions, |a| *a == Action::ObjectDeleted { id: id.clone() }));
    assert!(core.project().find_object(&id).is_none());
    assert!(core.selection().is_none());
}

#[test]
fn delete_without_selection_is_noop() {
    let mut core = EngineCore::new();
    assert!(core.on_key_down(&key("Backspace"), no_modifiers()).is_empty());
}

#[test]
fn ctrl_z_undoes_and_shift_redoes() {
    let mut core = EngineCore::new();
    let id = add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    core.on_key_down(&key("z"), ctrl_modifier());
    assert!(core.project().find_object(&id).is_none());

    core.on_key_down(&key("Z"), Modifiers { shift: true, ..ctrl_modifier() });
    assert!(core.project().find_object(&id).is_some());
}

#[test]
fn undo_at_start_is_noop() {
    let mut core = EngineCore::new();
    assert!(core.undo().is_empty());
    assert_eq!(core.history.cursor(), 0);
}

#[test]
fn undo_clears_selection() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    add(&mut core, SceneObject::rect(50.0, 50.0, 20.0, 20.0));
    click(&mut core, pt(10.0, 10.0));
    let actions = core.undo();
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
}

#[test]
fn edit_after_undo_drops_redo() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    core.undo();
    add(&mut core, SceneObject::rect(50.0, 50.0, 20.0, 20.0));
    assert!(core.redo().is_empty());
}

// =============================================================
// Properties
// =============================================================

#[test]
fn fov_clamps_per_camera_kind() {
    let mut core = EngineCore::new();
    let bullet = add(&mut core, SceneObject::camera(pt(0.0, 0.0), CameraKind::Bullet));
    let dome = add(&mut core, SceneObject::camera(pt(200.0, 0.0), CameraKind::Dome));

    core.ui.selected_id = Some(bullet.clone());
    core.set_camera_fov(500.0);
    core.ui.selected_id = Some(dome.clone());
    core.set_camera_fov(500.0);

    assert_eq!(object(&core, &bullet).as_camera().unwrap().fov, 180.0);
    assert_eq!(object(&core, &dome).as_camera().unwrap().fov, 359.0);

    core.set_camera_fov(1.0);
    assert_eq!(object(&core, &dome).as_camera().unwrap().fov, 10.0);
}

#[test]
fn range_and_text_size_clamp() {
    let mut core = EngineCore::new();
    let cam = add(&mut core, SceneObject::camera(pt(0.0, 0.0), CameraKind::Bullet));
    let text = add(&mut core, SceneObject::default_text(pt(100.0, 0.0)));

    core.ui.selected_id = Some(cam.clone());
    core.set_camera_range(5.0);
    assert_eq!(object(&core, &cam).as_camera().unwrap().range, 20.0);

    core.ui.selected_id = Some(text.clone());
    core.set_text_size(100.0);
    assert_eq!(object(&core, &text).as_text().unwrap().size, 48.0);
}

#[test]
fn property_edit_is_one_step_and_skips_noops() {
    let mut core = EngineCore::new();
    let cam = add(&mut core, SceneObject::camera(pt(0.0, 0.0), CameraKind::Bullet));
    core.ui.selected_id = Some(cam);
    let before = core.history.len();

    assert!(core.set_camera_range(100.0).is_empty());
    assert!(core.set_text_size(20.0).is_empty());
    assert!(core.set_camera_fov(f64::NAN).is_empty());
    assert!(has_history_changed(&core.set_camera_range(250.0)));
    assert_eq!(core.history.len(), before + 1);
}

#[test]
fn property_edit_without_selection_is_noop() {
    let mut core = EngineCore::new();
    assert!(core.set_camera_fov(45.0).is_empty());
}

// =============================================================
// Layers and floors
// =============================================================

#[test]
fn add_layer_ignores_blank_names() {
    let mut core = EngineCore::new();
    assert!(core.add_layer("   ").unwrap().is_empty());
    core.add_layer("Wiring").unwrap();
    let layers = &core.active_floor().unwrap().layers;
    assert_eq!(layers.len(), 3);
    assert_eq!(layers[2].name, "Wiring");
}

#[test]
fn last_layer_cannot_be_deleted() {
    let mut core = EngineCore::new();
    core.delete_active_layer().unwrap();
    let before = core.history.len();
    assert!(matches!(core.delete_active_layer(), Err(EditError::LastLayer)));
    assert_eq!(core.history.len(), before);
}

#[test]
fn deleting_layer_drops_its_selection() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    click(&mut core, pt(10.0, 10.0));
    core.delete_active_layer().unwrap();
    assert!(core.selection().is_none());
}

#[test]
fn set_active_layer_rejects_unknown_id() {
    let mut core = EngineCore::new();
    assert!(matches!(core.set_active_layer("nope"), Err(EditError::LayerNotFound(_))));
    let first = core.active_floor().unwrap().layers[0].id.clone();
    core.set_active_layer(&first).unwrap();
    assert_eq!(core.active_floor().unwrap().active_layer_id, first);
    assert!(core.set_active_layer(&first).unwrap().is_empty());
}

#[test]
fn add_floor_switches_and_clears_selection() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    click(&mut core, pt(10.0, 10.0));
    core.add_floor("First floor");
    assert_eq!(core.project().active_floor_index, 1);
    assert_eq!(core.active_floor().unwrap().name, "First floor");
    assert!(core.selection().is_none());
}

#[test]
fn rename_and_switch_floor_noops() {
    let mut core = EngineCore::new();
    assert!(core.rename_floor(0, "Ground floor").unwrap().is_empty());
    assert!(core.rename_floor(0, "").unwrap().is_empty());
    assert!(core.switch_floor(0).unwrap().is_empty());
    assert!(matches!(core.switch_floor(4), Err(EditError::FloorOutOfRange { index: 4, len: 1 })));
    assert!(matches!(core.rename_floor(4, "x"), Err(EditError::FloorOutOfRange { .. })));

    core.rename_floor(0, "Basement").unwrap();
    assert_eq!(core.project().floors[0].name, "Basement");
}

// =============================================================
// Documents and backgrounds
// =============================================================

#[test]
fn load_failure_leaves_project_untouched() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));
    let before = core.project().clone();
    assert!(core.load_project("{ not json").is_err());
    assert!(core.load_project(r#"{"floors":[],"activeFloorIndex":0}"#).is_err());
    assert_eq!(*core.project(), before);
    assert_eq!(core.history.len(), 2);
}

#[test]
fn save_then_load_resets_history() {
    let mut core = EngineCore::new();
    let id = add(&mut core, SceneObject::camera(pt(1.0, 2.0), CameraKind::Dome));
    click(&mut core, pt(1.0, 2.0));
    let json = core.save_project(false).unwrap();

    let mut other = EngineCore::new();
    other.load_project(&json).unwrap();
    assert_eq!(other.history.len(), 1);
    assert_eq!(other.project(), core.project());
    assert!(other.project().find_object(&id).is_some());

    core.load_project(&json).unwrap();
    assert!(core.selection().is_none());
}

#[test]
fn import_background_places_at_origin() {
    let mut core = EngineCore::new();
    core.import_background(RasterizedPage { data: "data:image/png;base64,AA".into(), width: 640.0, height: 480.0 })
        .unwrap();
    let bg = core.active_floor().unwrap().background.clone().unwrap();
    assert_eq!((bg.x, bg.y, bg.width, bg.height), (0.0, 0.0, 640.0, 480.0));
}

#[test]
fn import_empty_page_is_rejected() {
    let mut core = EngineCore::new();
    let err = core.import_background(RasterizedPage { data: "x".into(), width: 0.0, height: 10.0 });
    assert!(matches!(err, Err(BackgroundError::EmptyPage { .. })));
    assert_eq!(core.history.len(), 1);
}

struct FailingRasterizer;

impl PageRasterizer for FailingRasterizer {
    fn rasterize(&self, _bytes: &[u8]) -> Result<RasterizedPage, BackgroundError> {
        Err(BackgroundError::Rasterize("not a pdf".into()))
    }
}

struct FixedRasterizer;

impl PageRasterizer for FixedRasterizer {
    fn rasterize(&self, bytes: &[u8]) -> Result<RasterizedPage, BackgroundError> {
        Ok(RasterizedPage { data: format!("page:{}", bytes.len()), width: 100.0, height: 50.0 })
    }
}

#[test]
fn import_page_goes_through_rasterizer() {
    let mut core = EngineCore::new();
    assert!(core.import_background_page(&FailingRasterizer, b"%PDF").is_err());
    assert_eq!(core.history.len(), 1);

    core.import_background_page(&FixedRasterizer, b"%PDF").unwrap();
    assert_eq!(core.active_floor().unwrap().background.as_ref().unwrap().data, "page:4");
}

// =============================================================
// Queries and cursor
// =============================================================

#[test]
fn coverage_and_export_follow_active_floor() {
    let mut core = EngineCore::new();
    assert!(matches!(core.export_request(), Err(EditError::NothingToExport)));
    let id = add(&mut core, SceneObject::camera(pt(0.0, 0.0), CameraKind::Bullet));

    let coverage = core.coverage();
    assert_eq!(coverage.len(), 1);
    assert_eq!(coverage[0].0, id);
    assert!(core.export_request().is_ok());

    core.add_floor("Empty");
    assert!(core.coverage().is_empty());
}

#[test]
fn hover_cursor_follows_hit() {
    let mut core = EngineCore::new();
    add(&mut core, SceneObject::rect(0.0, 0.0, 20.0, 20.0));

    let actions = core.on_pointer_move(pt(10.0, 10.0), no_modifiers());
    assert!(has_action(&actions, |a| *a == Action::SetCursor(Cursor::Move)));
    assert_eq!(core.cursor(), Cursor::Move);

    assert!(core.on_pointer_move(pt(11.0, 10.0), no_modifiers()).is_empty());

    core.on_pointer_move(pt(100.0, 100.0), no_modifiers());
    assert_eq!(core.cursor(), Cursor::Default);
}

#[test]
fn tool_cursor_on_switch() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rect);
    assert_eq!(core.cursor(), Cursor::Crosshair);
    core.set_tool(Tool::DomeCam);
    assert_eq!(core.cursor(), Cursor::Copy);
}
