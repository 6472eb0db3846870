use scaffolder_core::{
    MergeError, PlatformMetadata, Repository, RepositoryKey, SourceMetadata,
};

fn source(owner: &str, name: &str) -> SourceMetadata {
    SourceMetadata {
        owner: owner.to_string(),
        name: name.to_string(),
        description: "a template".to_string(),
        language: Some("Rust".to_string()),
        owner_type: "User".to_string(),
        owner_avatar_url: "https://avatars.example.com/1".to_string(),
    }
}

fn platform(favorite_count: u32) -> PlatformMetadata {
    PlatformMetadata {
        favorite_count,
        ..PlatformMetadata::default()
    }
}

#[test]
fn key_serialization_round_trips_identity() {
    let a = RepositoryKey::new("GitHub", "42");
    let b = RepositoryKey::new("GitHub", "42");
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "GitHub:42");
    assert_eq!(a.to_string(), b.to_string());
    assert_ne!(a, RepositoryKey::new("GitLab", "42"));
    assert_ne!(a, RepositoryKey::new("GitHub", "43"));
}

#[test]
fn merge_replaces_whole_facets_and_keeps_absent_ones() {
    let key = RepositoryKey::new("GitHub", "1");
    let mut base = Repository::from_source(key.clone(), source("octocat", "starter"));
    let incoming = Repository::from_platform(key, platform(3));

    base.merge_in(incoming).expect("same key");
    assert_eq!(base.source(), Some(&source("octocat", "starter")));
    assert_eq!(base.platform(), Some(&platform(3)));
}

#[test]
fn merge_is_idempotent() {
    let key = RepositoryKey::new("GitHub", "1");
    let mut merged = Repository::from_source(key.clone(), source("octocat", "starter"));
    let copy = merged.clone();

    merged.merge_in(copy.clone()).expect("same key");
    assert_eq!(merged, copy);
}

#[test]
fn merge_converges_regardless_of_arrival_order() {
    let key = RepositoryKey::new("GitHub", "1");
    let bare = Repository::new(key.clone());
    let with_source = Repository::from_source(key.clone(), source("octocat", "starter"));
    let with_platform = Repository::from_platform(key.clone(), platform(7));

    let mut orders = Vec::new();
    for permutation in [
        [&bare, &with_source, &with_platform],
        [&with_source, &bare, &with_platform],
        [&with_platform, &with_source, &bare],
        [&with_platform, &bare, &with_source],
    ] {
        let mut accumulated = Repository::new(key.clone());
        for record in permutation {
            accumulated.merge_in((*record).clone()).expect("same key");
        }
        orders.push(accumulated);
    }

    for merged in &orders {
        assert_eq!(merged.source(), Some(&source("octocat", "starter")));
        assert_eq!(merged.platform(), Some(&platform(7)));
    }
}

#[test]
fn merge_rejects_mismatched_keys() {
    let mut left = Repository::new(RepositoryKey::new("GitHub", "1"));
    let right = Repository::new(RepositoryKey::new("GitHub", "2"));

    let err = left.merge_in(right).unwrap_err();
    assert!(matches!(err, MergeError::IdentityMismatch { .. }));
}

#[test]
fn single_favorite_counts_as_popular() {
    let key = RepositoryKey::new("GitHub", "9");
    let repository = Repository::from_platform(key, platform(1));
    assert!(repository.is_popular());

    let unloved = Repository::from_platform(RepositoryKey::new("GitHub", "10"), platform(0));
    assert!(!unloved.is_popular());
}
