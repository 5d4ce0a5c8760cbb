use super::*;

fn frame(data: Vec<u8>, width: u32, height: u32) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data,
        premultiplied: true,
    }
}

#[test]
fn pixel_reads_row_major_and_rejects_out_of_bounds() {
    let f = frame((0u8..16).collect(), 2, 2);
    assert_eq!(f.pixel(1, 0), Some([4, 5, 6, 7]));
    assert_eq!(f.pixel(0, 1), Some([8, 9, 10, 11]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.pixel(0, 2), None);
}

#[test]
fn straight_alpha_undoes_premultiplication() {
    let f = frame(vec![128, 64, 0, 128, 10, 10, 10, 0, 255, 0, 0, 255], 3, 1);
    assert_eq!(
        f.to_straight(),
        vec![255, 128, 0, 128, 0, 0, 0, 0, 255, 0, 0, 255]
    );

    let straight = FrameRGBA {
        premultiplied: false,
        ..f.clone()
    };
    assert_eq!(straight.to_straight(), f.data);
}

#[test]
fn write_png_round_trips_through_image() {
    let dir = std::env::temp_dir().join(format!("catvatar-frame-{}", std::process::id()));
    let path = dir.join("nested").join("frame.png");
    let f = frame(vec![255, 0, 0, 255, 0, 0, 0, 0], 2, 1);
    f.write_png(&path).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0[3], 0);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn mismatched_buffer_is_a_render_error() {
    let f = frame(vec![0; 7], 2, 1);
    let path = std::env::temp_dir().join("catvatar-never-written.png");
    assert!(matches!(f.write_png(&path), Err(AvatarError::Render(_))));
}
