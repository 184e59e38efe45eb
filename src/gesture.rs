//! Gesture translator: the physics-to-map core. Consumes one step's body
//! snapshot and contact list and turns wall hits into pans and side-crossings
//! into zoom steps. All state is explicit; the session owns it and passes it
//! in, which keeps this module testable without a timer or a live map.

use crate::config::{LeashConfig, PanMode};
use crate::map::MapPort;
use crate::model::{Contact, Side, Vec2, Viewport, WallSide};

/// The only mutable core state: last observed collider side and the staged
/// pan deltas awaiting the next flush.
#[derive(Debug, Default)]
pub struct GestureState {
    pub side: Option<Side>,
    pub pan_acc: Vec2,
}

/// Everything the translator reads for one tick. Positions are sampled after
/// the step, so handle and collider reflect the same instant.
pub struct TickContext<'a> {
    pub handle: Vec2,
    pub collider: Vec2,
    pub pointer: Vec2,
    pub viewport: Viewport,
    pub contacts: &'a [Contact],
}

pub fn apply(cfg: &LeashConfig, state: &mut GestureState, ctx: &TickContext, map: &mut dyn MapPort) {
    pan_from_contacts(cfg, state, ctx.contacts, map);
    zoom_from_rotation(cfg, state, ctx, map);
}

/// Unit push direction for a contact, from whichever wall roles it carries.
fn wall_axes(contact: &Contact) -> (f64, f64) {
    let mut x = 0.0;
    let mut y = 0.0;
    for role in [contact.a, contact.b] {
        match role.wall_side() {
            Some(WallSide::Left) => x = -1.0,
            Some(WallSide::Right) => x = 1.0,
            Some(WallSide::Top) => y = -1.0,
            Some(WallSide::Bottom) => y = 1.0,
            None => {}
        }
    }
    (x, y)
}

/// Collision -> pan. Only the heavy trailing body moves the map; shallow
/// contacts are noise and skipped.
pub fn pan_from_contacts(
    cfg: &LeashConfig,
    state: &mut GestureState,
    contacts: &[Contact],
    map: &mut dyn MapPort,
) {
    for contact in contacts {
        if contact.depth < cfg.min_separation {
            continue;
        }
        if !contact.involves_collider() {
            continue;
        }
        let (ax, ay) = wall_axes(contact);
        if ax == 0.0 && ay == 0.0 {
            continue;
        }
        match cfg.pan {
            PanMode::Pixel { scale } => {
                let travel = scale * contact.depth;
                state.pan_acc.x += ax * travel;
                state.pan_acc.y += ay * travel;
            }
            PanMode::Geographic { k1, k2, lat_clamp } => {
                // same physical push moves a constant geographic distance
                let deg_per_px = k1 * k2.powi(23 - map.get_zoom());
                let (lat, lng) = map.get_center();
                // screen-down pans the center south
                let lat = (lat - ay * contact.depth * deg_per_px).clamp(-lat_clamp, lat_clamp);
                let lng = lng + ax * contact.depth * deg_per_px;
                map.pan_to(lat, lng);
            }
        }
    }
}

/// Side-crossing -> zoom. Needs two distinct classifications to detect a
/// crossing; fires only while the collider swings above the handle.
pub fn zoom_from_rotation(
    cfg: &LeashConfig,
    state: &mut GestureState,
    ctx: &TickContext,
    map: &mut dyn MapPort,
) {
    let distance = ctx.handle.distance(ctx.collider);
    if distance < cfg.rotation_min_distance {
        return;
    }

    let side = if ctx.collider.x > ctx.handle.x { Side::Right } else { Side::Left };

    let Some(previous) = state.side else {
        state.side = Some(side);
        return;
    };

    let crossed = side != previous;
    let above = ctx.collider.y < ctx.handle.y;
    let away_from_edges = cfg.edge_margin.is_none_or(|margin| {
        ctx.pointer.x >= margin
            && ctx.pointer.y >= margin
            && ctx.pointer.x <= ctx.viewport.width - margin
            && ctx.pointer.y <= ctx.viewport.height - margin
    });

    if crossed && above && away_from_edges {
        let step = if side == Side::Right { 1 } else { -1 };
        let zoom = map.get_zoom();
        map.set_zoom(zoom + step);
    }
    state.side = Some(side);
}

/// Staggered pan flush: dispatch the staged deltas in one call and zero the
/// accumulator. Batching exists because the adapter queues rapid pan calls
/// instead of coalescing them.
pub fn flush_pan(state: &mut GestureState, map: &mut dyn MapPort) {
    if state.pan_acc != Vec2::ZERO {
        map.pan_by(state.pan_acc.x, state.pan_acc.y);
    }
    state.pan_acc = Vec2::ZERO;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::RecordingMap;
    use crate::model::BodyRole;

    fn classic() -> LeashConfig {
        LeashConfig::classic()
    }

    fn wall(side: WallSide) -> BodyRole {
        BodyRole::Wall(side)
    }

    fn collider_hit(side: WallSide, depth: f64) -> Contact {
        Contact { a: BodyRole::Collider, b: wall(side), depth }
    }

    fn ctx_at(handle: Vec2, collider: Vec2) -> TickContext<'static> {
        TickContext {
            handle,
            collider,
            pointer: Vec2::new(400.0, 300.0),
            viewport: Viewport { width: 800.0, height: 600.0 },
            contacts: &[],
        }
    }

    #[test]
    fn non_collider_pairs_emit_nothing() {
        let cfg = classic();
        let mut state = GestureState::default();
        let mut map = RecordingMap::default();
        let contacts = [
            Contact { a: BodyRole::Handle, b: wall(WallSide::Left), depth: 5.0 },
            Contact { a: wall(WallSide::Top), b: wall(WallSide::Left), depth: 5.0 },
        ];
        pan_from_contacts(&cfg, &mut state, &contacts, &mut map);
        flush_pan(&mut state, &mut map);
        assert_eq!(map.total_calls(), 0);
    }

    #[test]
    fn shallow_contacts_are_noise() {
        let cfg = classic();
        let mut state = GestureState::default();
        let mut map = RecordingMap::default();
        let contacts = [collider_hit(WallSide::Right, 0.99)];
        pan_from_contacts(&cfg, &mut state, &contacts, &mut map);
        flush_pan(&mut state, &mut map);
        assert_eq!(map.total_calls(), 0);
    }

    #[test]
    fn wall_side_determines_pan_sign() {
        let cfg = classic();
        let cases = [
            (WallSide::Left, (-30.0, 0.0)),
            (WallSide::Right, (30.0, 0.0)),
            (WallSide::Top, (0.0, -30.0)),
            (WallSide::Bottom, (0.0, 30.0)),
        ];
        for (side, expected) in cases {
            let mut state = GestureState::default();
            let mut map = RecordingMap::default();
            pan_from_contacts(&cfg, &mut state, &[collider_hit(side, 1.0)], &mut map);
            flush_pan(&mut state, &mut map);
            assert_eq!(map.pan_by_calls, vec![expected], "side {side:?}");
        }
    }

    #[test]
    fn left_wall_depth_two_scale_thirty_pans_minus_sixty() {
        let cfg = classic();
        let mut state = GestureState::default();
        let mut map = RecordingMap::default();
        pan_from_contacts(&cfg, &mut state, &[collider_hit(WallSide::Left, 2.0)], &mut map);
        flush_pan(&mut state, &mut map);
        assert_eq!(map.pan_by_calls, vec![(-60.0, 0.0)]);
    }

    #[test]
    fn corner_hit_accrues_both_components() {
        let cfg = classic();
        let mut state = GestureState::default();
        let mut map = RecordingMap::default();
        let contacts = [
            collider_hit(WallSide::Right, 2.0),
            collider_hit(WallSide::Bottom, 3.0),
        ];
        pan_from_contacts(&cfg, &mut state, &contacts, &mut map);
        flush_pan(&mut state, &mut map);
        assert_eq!(map.pan_by_calls, vec![(60.0, 90.0)]);
    }

    #[test]
    fn accumulator_is_zero_after_every_flush() {
        let cfg = classic();
        let mut state = GestureState::default();
        let mut map = RecordingMap::default();
        pan_from_contacts(&cfg, &mut state, &[collider_hit(WallSide::Right, 4.0)], &mut map);
        assert_ne!(state.pan_acc, Vec2::ZERO);
        flush_pan(&mut state, &mut map);
        assert_eq!(state.pan_acc, Vec2::ZERO);
        // empty flush stays silent
        flush_pan(&mut state, &mut map);
        assert_eq!(map.pan_by_calls.len(), 1);
    }

    #[test]
    fn geographic_pan_compensates_for_zoom() {
        let cfg = LeashConfig::geographic();
        let PanMode::Geographic { k1, k2, .. } = cfg.pan else { unreachable!() };
        let mut state = GestureState::default();
        let mut map = RecordingMap { zoom: 21, center: (10.0, 20.0), ..Default::default() };
        pan_from_contacts(&cfg, &mut state, &[collider_hit(WallSide::Right, 2.0)], &mut map);
        let deg = 2.0 * (k1 * k2.powi(2));
        assert_eq!(map.pan_to_calls, vec![(10.0, 20.0 + deg)]);
        // accumulator untouched in geographic mode
        assert_eq!(state.pan_acc, Vec2::ZERO);
    }

    #[test]
    fn latitude_clamps_at_the_bound_longitude_never_does() {
        let cfg = LeashConfig::geographic();
        let mut state = GestureState::default();
        let mut map = RecordingMap { zoom: 3, center: (79.5, 179.0), ..Default::default() };
        // top wall pushes north (and a huge depth to blow past the bound)
        let contacts = [
            collider_hit(WallSide::Top, 500.0),
            collider_hit(WallSide::Right, 500.0),
        ];
        pan_from_contacts(&cfg, &mut state, &contacts, &mut map);
        let (lat, _) = map.pan_to_calls[0];
        assert_eq!(lat, 80.0);
        let (_, lng) = *map.pan_to_calls.last().unwrap();
        assert!(lng > 179.0, "longitude is unclamped, got {lng}");
    }

    #[test]
    fn first_classification_records_without_zooming() {
        let cfg = classic();
        let mut state = GestureState::default();
        let mut map = RecordingMap { zoom: 10, ..Default::default() };
        let ctx = ctx_at(Vec2::new(400.0, 300.0), Vec2::new(500.0, 200.0));
        zoom_from_rotation(&cfg, &mut state, &ctx, &mut map);
        assert_eq!(state.side, Some(Side::Right));
        assert!(map.zoom_calls.is_empty());
    }

    #[test]
    fn crossing_right_above_the_handle_zooms_in() {
        // handle (400,300), collider was left, now (420,200): above and right
        let cfg = classic();
        let mut state = GestureState { side: Some(Side::Left), ..Default::default() };
        let mut map = RecordingMap { zoom: 10, ..Default::default() };
        let ctx = ctx_at(Vec2::new(400.0, 300.0), Vec2::new(420.0, 200.0));
        zoom_from_rotation(&cfg, &mut state, &ctx, &mut map);
        assert_eq!(map.zoom_calls, vec![11]);
        assert_eq!(state.side, Some(Side::Right));
    }

    #[test]
    fn crossing_left_decrements_zoom() {
        let cfg = classic();
        let mut state = GestureState { side: Some(Side::Right), ..Default::default() };
        let mut map = RecordingMap { zoom: 10, ..Default::default() };
        let ctx = ctx_at(Vec2::new(400.0, 300.0), Vec2::new(380.0, 200.0));
        zoom_from_rotation(&cfg, &mut state, &ctx, &mut map);
        assert_eq!(map.zoom_calls, vec![9]);
    }

    #[test]
    fn crossing_below_the_handle_only_flips_the_side() {
        let cfg = classic();
        let mut state = GestureState { side: Some(Side::Left), ..Default::default() };
        let mut map = RecordingMap { zoom: 10, ..Default::default() };
        let ctx = ctx_at(Vec2::new(400.0, 300.0), Vec2::new(420.0, 400.0));
        zoom_from_rotation(&cfg, &mut state, &ctx, &mut map);
        assert!(map.zoom_calls.is_empty());
        assert_eq!(state.side, Some(Side::Right));
    }

    #[test]
    fn settled_chain_makes_no_side_decision() {
        let cfg = classic();
        let mut state = GestureState { side: Some(Side::Left), ..Default::default() };
        let mut map = RecordingMap { zoom: 10, ..Default::default() };
        // distance well under the 80 px threshold
        let ctx = ctx_at(Vec2::new(400.0, 300.0), Vec2::new(415.0, 295.0));
        zoom_from_rotation(&cfg, &mut state, &ctx, &mut map);
        assert!(map.zoom_calls.is_empty());
        assert_eq!(state.side, Some(Side::Left), "side state untouched at rest");
    }

    #[test]
    fn pointer_near_an_edge_suppresses_zoom_but_updates_side() {
        let cfg = LeashConfig::geographic();
        let mut state = GestureState { side: Some(Side::Left), ..Default::default() };
        let mut map = RecordingMap { zoom: 10, ..Default::default() };
        let mut ctx = ctx_at(Vec2::new(400.0, 300.0), Vec2::new(420.0, 200.0));
        ctx.pointer = Vec2::new(50.0, 300.0); // within the 100 px margin
        zoom_from_rotation(&cfg, &mut state, &ctx, &mut map);
        assert!(map.zoom_calls.is_empty());
        assert_eq!(state.side, Some(Side::Right));
    }

    #[test]
    fn zoom_count_equals_qualifying_crossings() {
        let cfg = classic();
        let mut state = GestureState::default();
        let mut map = RecordingMap { zoom: 10, ..Default::default() };
        let handle = Vec2::new(400.0, 300.0);
        // swings: first sample records; then R->L above (fires), L->R above
        // (fires), R->R (no crossing), R->L below (no fire), L->L short (no
        // decision), then L->R above (fires)
        let samples = [
            Vec2::new(500.0, 200.0),
            Vec2::new(300.0, 200.0),
            Vec2::new(500.0, 210.0),
            Vec2::new(490.0, 190.0),
            Vec2::new(310.0, 400.0),
            Vec2::new(390.0, 310.0),
            Vec2::new(520.0, 180.0),
        ];
        for collider in samples {
            let ctx = ctx_at(handle, collider);
            zoom_from_rotation(&cfg, &mut state, &ctx, &mut map);
        }
        assert_eq!(map.zoom_calls, vec![9, 10, 11]);
    }
}
