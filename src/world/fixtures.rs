//! Hand-built levels shared by unit tests across the crate.

use glam::vec2;

use crate::world::{
    Level, Node, NodeChild, NO_TEXTURE, Palette, Sector, SectorMotion, Segment, Side, Subsector,
    Texture, TextureBank, TextureId, Thing, Vertex, Wall, WallFlags, WallId, PLAYER1_START,
};

pub const WALL_TEX: TextureId = 0;
pub const FLOOR_TEX: TextureId = 1;
pub const CEIL_TEX: TextureId = 2;
pub const UPPER_TEX: TextureId = 3;
pub const FAR_TEX: TextureId = 4;

/// Pure colours so tests can tell surfaces apart after lighting.
pub const WALL_RGB: u32 = 0x00FF_0000;
pub const FLOOR_RGB: u32 = 0x0000_FF00;
pub const CEIL_RGB: u32 = 0x0000_00FF;
pub const UPPER_RGB: u32 = 0x00FF_FF00;
pub const FAR_RGB: u32 = 0x0000_FFFF;

/// The two-sided wall of [`window_level`].
pub const WINDOW_WALL: WallId = 3;

/// Bank whose ids line up with the `*_TEX` constants.
pub fn bank() -> TextureBank {
    let mut bank = TextureBank::new();
    let mut pal = Palette::default();
    let colours = [WALL_RGB, FLOOR_RGB, CEIL_RGB, UPPER_RGB, FAR_RGB];
    for (i, rgb) in colours.iter().enumerate() {
        pal[i + 1] = *rgb;
    }
    bank.set_palette(pal);
    for (i, name) in ["WALL", "FLOOR", "CEIL", "UPPER", "FAR"].iter().enumerate() {
        bank.insert(*name, Texture::solid(8, 8, i as u8 + 1)).unwrap();
    }
    bank
}

fn sector(ceil_h: f32) -> Sector {
    Sector {
        floor_h: 0.0,
        ceil_h,
        floor_tex: FLOOR_TEX,
        ceil_tex: CEIL_TEX,
        light: 1.0,
        is_sky: false,
        special: 0,
        tag: 0,
        motion: SectorMotion::Idle,
    }
}

fn side(sector: u16, upper: TextureId, middle: TextureId) -> Side {
    Side {
        x_off: 0.0,
        y_off: 0.0,
        upper,
        lower: WALL_TEX,
        middle,
        sector,
    }
}

fn wall(v1: u16, v2: u16, front_side: u16, back_side: Option<u16>) -> Wall {
    let flags = match back_side {
        Some(_) => WallFlags::TWO_SIDED,
        None => WallFlags::IMPASSABLE,
    };
    Wall {
        v1,
        v2,
        flags,
        special: 0,
        tag: 0,
        front_side,
        back_side,
    }
}

fn seg(v1: u16, v2: u16, wall: WallId, opposite: bool) -> Segment {
    Segment {
        v1,
        v2,
        wall,
        opposite,
        offset: 0.0,
    }
}

/// 256×256 room, ceiling 128, no nodes, player start in the middle facing east.
pub fn square_room() -> Level {
    let vertices = [(0.0, 0.0), (256.0, 0.0), (256.0, 256.0), (0.0, 256.0)]
        .into_iter()
        .map(|(x, y)| Vertex { pos: vec2(x, y) })
        .collect();

    // clockwise, so every front side faces inwards
    let walls = vec![
        wall(0, 3, 0, None),
        wall(3, 2, 1, None),
        wall(2, 1, 2, None),
        wall(1, 0, 3, None),
    ];
    let segments = walls
        .iter()
        .enumerate()
        .map(|(i, w)| seg(w.v1, w.v2, i as WallId, false))
        .collect();

    Level {
        name: "ROOM".into(),
        things: vec![Thing {
            pos: vec2(128.0, 128.0),
            angle: 0.0,
            type_id: PLAYER1_START,
        }],
        walls,
        sides: (0..4).map(|_| side(0, NO_TEXTURE, WALL_TEX)).collect(),
        vertices,
        segments,
        subsectors: vec![Subsector {
            seg_count: 4,
            first_seg: 0,
        }],
        nodes: Vec::new(),
        sectors: vec![sector(128.0)],
    }
}

/// Two 256×256 rooms side by side, split by one node at x = 256.
///
/// * sector 0: west room, `near_ceil` high, player start facing east.
/// * sector 1: east room, `far_ceil` high, far wall textured `FAR_TEX`.
/// * wall [`WINDOW_WALL`] joins them with `UPPER_TEX` on both sides.
pub fn window_level(near_ceil: f32, far_ceil: f32) -> Level {
    let vertices = [
        (0.0, 0.0),
        (256.0, 0.0),
        (512.0, 0.0),
        (512.0, 256.0),
        (256.0, 256.0),
        (0.0, 256.0),
    ]
    .into_iter()
    .map(|(x, y)| Vertex { pos: vec2(x, y) })
    .collect();

    let sides = vec![
        side(0, NO_TEXTURE, WALL_TEX), // 0 west
        side(0, NO_TEXTURE, WALL_TEX), // 1 north, near room
        side(0, NO_TEXTURE, WALL_TEX), // 2 south, near room
        side(0, UPPER_TEX, NO_TEXTURE), // 3 window, near face
        side(1, UPPER_TEX, NO_TEXTURE), // 4 window, far face
        side(1, NO_TEXTURE, WALL_TEX), // 5 north, far room
        side(1, NO_TEXTURE, FAR_TEX),  // 6 east
        side(1, NO_TEXTURE, WALL_TEX), // 7 south, far room
    ];

    let walls = vec![
        wall(0, 5, 0, None),
        wall(5, 4, 1, None),
        wall(1, 0, 2, None),
        wall(4, 1, 3, Some(4)),
        wall(4, 3, 5, None),
        wall(3, 2, 6, None),
        wall(2, 1, 7, None),
    ];

    let segments = vec![
        // subsector 0: near room
        seg(0, 5, 0, false),
        seg(5, 4, 1, false),
        seg(4, 1, WINDOW_WALL, false),
        seg(1, 0, 2, false),
        // subsector 1: far room
        seg(1, 4, WINDOW_WALL, true),
        seg(4, 3, 4, false),
        seg(3, 2, 5, false),
        seg(2, 1, 6, false),
    ];

    Level {
        name: "WINDOW".into(),
        things: vec![Thing {
            pos: vec2(128.0, 128.0),
            angle: 0.0,
            type_id: PLAYER1_START,
        }],
        walls,
        sides,
        vertices,
        segments,
        subsectors: vec![
            Subsector {
                seg_count: 4,
                first_seg: 0,
            },
            Subsector {
                seg_count: 4,
                first_seg: 4,
            },
        ],
        // right of a north-pointing line at x = 256 is the far room
        nodes: vec![Node {
            x: 256.0,
            y: 0.0,
            dx: 0.0,
            dy: 256.0,
            child: [NodeChild::Subsector(1), NodeChild::Subsector(0)],
        }],
        sectors: vec![sector(near_ceil), sector(far_ceil)],
    }
}
