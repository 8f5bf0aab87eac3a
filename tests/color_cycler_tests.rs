use smarthome_trace::core::{ColorCycler, MATERIAL_PALETTE, Shade};

#[test]
fn cycles_families_in_palette_order() {
    let mut cycler = ColorCycler::new();
    assert_eq!(cycler.next(Shade::A100), "#ff8a80");
    assert_eq!(cycler.next(Shade::A100), "#ff80ab");
    assert_eq!(cycler.next(Shade::S500), "#9c27b0");
    assert_eq!(cycler.index(), 3);
}

#[test]
fn wraps_after_the_last_family() {
    let mut cycler = ColorCycler::new();
    let len = cycler.palette_len();
    assert_eq!(len, MATERIAL_PALETTE.len());
    for _ in 0..len - 1 {
        cycler.next(Shade::A100);
    }
    assert_eq!(cycler.next(Shade::A100), "#cfd8dc");
    assert_eq!(cycler.index(), 0);
    assert_eq!(cycler.next(Shade::A100), "#ff8a80");
}

#[test]
fn palette_length_more_calls_reproduce_the_first_colors() {
    for n in [1usize, 5, 19, 23] {
        let mut cycler = ColorCycler::new();
        let len = cycler.palette_len();
        let first: Vec<_> = (0..n).map(|_| cycler.next(Shade::A100)).collect();

        let mut replay = ColorCycler::new();
        for _ in 0..len {
            replay.next(Shade::A100);
        }
        let again: Vec<_> = (0..n).map(|_| replay.next(Shade::A100)).collect();
        assert_eq!(first, again, "n = {n}");
    }
}

#[test]
fn independent_cyclers_do_not_share_state() {
    let mut residents = ColorCycler::new();
    let mut activities = ColorCycler::new();
    residents.next(Shade::A100);
    residents.next(Shade::A100);
    assert_eq!(activities.next(Shade::A100), "#ff8a80");
    assert_eq!(residents.next(Shade::A100), "#ea80fc");
}

#[test]
fn reset_restarts_at_first_family() {
    let mut cycler = ColorCycler::new();
    cycler.next(Shade::A100);
    cycler.reset();
    assert_eq!(cycler.next(Shade::A100), "#ff8a80");
}

#[test]
fn empty_custom_palette_falls_back_to_material() {
    let mut cycler = ColorCycler::with_palette(&[]);
    assert_eq!(cycler.palette_len(), MATERIAL_PALETTE.len());
    assert_eq!(cycler.next(Shade::A100), "#ff8a80");
}
