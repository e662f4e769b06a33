//! End-to-end sequences against a single resource instance, checking the
//! observable tag behavior across many requests.

use plugtest_core::{ETag, PlugtestResource, Request, ResponseCode, MAX_ETAG_LEN};

const CAPACITY: usize = 64;

fn get(res: &mut PlugtestResource) -> (ResponseCode, ETag) {
    let out = res.process(&Request::get(), CAPACITY);
    (out.code, out.etag.expect("GET always carries an ETag"))
}

#[test]
fn validation_scenario_from_startup() {
    let mut res = PlugtestResource::seeded(11);
    assert_eq!(res.state().tag(), &ETag::placeholder());
    assert!(res.state().pending_change());

    let (code, t1) = get(&mut res);
    assert_eq!(code, ResponseCode::Content);
    assert_ne!(t1, ETag::placeholder());

    let out = res.process(&Request::get().with_etag(t1), CAPACITY);
    assert_eq!(out.code, ResponseCode::Valid);
    assert_eq!(out.etag, Some(t1));
    assert!(res.state().pending_change());

    let (code, t2) = get(&mut res);
    assert_eq!(code, ResponseCode::Content);
    assert_ne!(t1, t2);
}

#[test]
fn non_validating_gets_are_stable() {
    let mut res = PlugtestResource::seeded(12);
    let (_, first) = get(&mut res);
    for i in 0..50u8 {
        let out = res.process(&Request::get().with_etag([i, i, i, i, i, i, i, i, i]), CAPACITY);
        assert_eq!(out.code, ResponseCode::Content);
        assert_eq!(out.etag, Some(first));
    }
    assert!(!res.state().pending_change());
}

#[test]
fn repeated_validation_rotates_every_other_get() {
    let mut res = PlugtestResource::seeded(13);
    let (_, mut current) = get(&mut res);
    for _ in 0..20 {
        let valid = res.process(&Request::get().with_etag(current), CAPACITY);
        assert_eq!(valid.code, ResponseCode::Valid);
        assert_eq!(valid.etag, Some(current));

        let (code, next) = get(&mut res);
        assert_eq!(code, ResponseCode::Content);
        assert_ne!(next, current);
        current = next;
    }
}

#[test]
fn rotated_tags_stay_within_bounds() {
    let mut res = PlugtestResource::seeded(14);
    for _ in 0..1000 {
        let out = res.process(&Request::put(), CAPACITY);
        assert_eq!(out.code, ResponseCode::Changed);
        let tag = out.etag.unwrap();
        assert!((1..=MAX_ETAG_LEN).contains(&tag.len()));
        assert_eq!(tag.as_bytes().len(), tag.len());
    }
}

#[test]
fn if_none_match_alternation_ignores_tag_state() {
    let mut res = PlugtestResource::seeded(15);
    let expected = [ResponseCode::Created, ResponseCode::PreconditionFailed];
    for i in 0..10 {
        // Interleave tag-changing traffic; the alternation must not care.
        res.process(&Request::put(), CAPACITY);
        get(&mut res);
        let out = res.process(&Request::put().with_if_none_match(), CAPACITY);
        assert_eq!(out.code, expected[i % 2], "iteration {}", i);
    }
}

#[test]
fn if_match_optimistic_update_cycle() {
    let mut res = PlugtestResource::seeded(16);
    let (_, t1) = get(&mut res);

    let changed = res.process(&Request::put().with_if_match(t1), CAPACITY);
    assert_eq!(changed.code, ResponseCode::Changed);
    let t2 = changed.etag.unwrap();
    assert_ne!(t1, t2);

    // A second writer still holding t1 loses.
    let stale = res.process(&Request::put().with_if_match(t1), CAPACITY);
    assert_eq!(stale.code, ResponseCode::PreconditionFailed);
    assert_eq!(res.state().tag(), &t2);

    // The matching PUT left the resource dirty: the next GET rotates past t2.
    let (code, t3) = get(&mut res);
    assert_eq!(code, ResponseCode::Content);
    assert_ne!(t3, t2);
}

#[test]
fn post_and_delete_leave_state_untouched() {
    let mut res = PlugtestResource::seeded(17);
    get(&mut res);
    res.process(&Request::put().with_if_none_match(), CAPACITY);
    let before = res.state().clone();

    for _ in 0..10 {
        assert_eq!(
            res.process(&Request::post(), CAPACITY).code,
            ResponseCode::Created
        );
        assert_eq!(
            res.process(&Request::delete(), CAPACITY).code,
            ResponseCode::Deleted
        );
    }
    assert_eq!(res.state(), &before);
}

#[test]
fn seeded_resources_are_reproducible() {
    let mut a = PlugtestResource::seeded(99);
    let mut b = PlugtestResource::seeded(99);
    for _ in 0..10 {
        let ta = a.process(&Request::put(), CAPACITY).etag;
        let tb = b.process(&Request::put(), CAPACITY).etag;
        assert_eq!(ta, tb);
    }
}
