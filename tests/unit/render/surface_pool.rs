use super::*;

#[test]
fn pool_honors_bucket_cap() {
    let mut p = SurfacePool::new(SurfacePoolOpts::default().with_max_surfaces_per_bucket(1));
    let size = ISize::new(8, 8);

    let a = p.borrow(size).unwrap();
    let b = p.borrow(size).unwrap();
    p.release(a);
    p.release(b);

    let st = p.stats();
    assert_eq!(st.retained_surfaces, 1);
    assert_eq!(st.dropped_on_release, 1);
}

#[test]
fn pool_honors_global_byte_cap() {
    let bytes_8x8 = ISize::new(8, 8).rgba8_len();
    let mut p = SurfacePool::new(SurfacePoolOpts::default().with_max_pool_bytes(bytes_8x8));
    let size = ISize::new(8, 8);

    let a = p.borrow(size).unwrap();
    let b = p.borrow(size).unwrap();
    p.release(a);
    p.release(b);

    let st = p.stats();
    assert_eq!(st.retained_bytes, bytes_8x8);
    assert_eq!(st.retained_surfaces, 1);
    assert!(st.dropped_on_release >= 1);
}

#[test]
fn released_pixmap_is_reused_for_same_size_only() {
    let mut p = SurfacePool::new(SurfacePoolOpts::default());
    let a = p.borrow(ISize::new(4, 2)).unwrap();
    p.release(a);

    let other = p.borrow(ISize::new(2, 4)).unwrap();
    assert_eq!((other.width(), other.height()), (2, 4));
    let again = p.borrow(ISize::new(4, 2)).unwrap();
    assert_eq!((again.width(), again.height()), (4, 2));

    let st = p.stats();
    assert_eq!(st.alloc_surfaces, 2);
    assert_eq!(st.reused_surfaces, 1);
    assert_eq!(st.retained_surfaces, 0);
}

#[test]
fn zero_caps_disable_retention() {
    let mut p = SurfacePool::new(SurfacePoolOpts::default().with_max_pool_bytes(0));
    let a = p.borrow(ISize::new(2, 2)).unwrap();
    p.release(a);
    assert_eq!(p.stats().retained_surfaces, 0);
    assert_eq!(p.stats().dropped_on_release, 1);
}

#[test]
fn oversized_borrow_is_an_error() {
    let mut p = SurfacePool::new(SurfacePoolOpts::default());
    assert!(p.borrow(ISize::new(70_000, 1)).is_err());
}
