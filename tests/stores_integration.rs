use assert_matches::assert_matches;
use chrono::{Local, NaiveDate};
use pawtrack::community::{CommunityFeed, FeedTab, DEFAULT_POST_TAGS};
use pawtrack::diary::{DiaryBook, HealthKind, ProfileField};
use pawtrack::error::StoreError;
use pawtrack::facilities::{Category, FacilityDirectory, FacilityFilter};
use pawtrack::seed;
use pawtrack::store::Id;

fn feed() -> CommunityFeed {
    CommunityFeed::new(seed::current_user(), seed::posts(Local::now()))
}

#[test]
fn diary_keeps_newest_record_first_and_plans_vaccinations() {
    let mut diary = DiaryBook::new(seed::dog_profile(), seed::health_records());
    let date = NaiveDate::from_ymd_opt(2023, 5, 2).unwrap();

    let id = diary
        .add_health_record(date, HealthKind::Vaccination, "Rabies booster")
        .unwrap()
        .id;
    assert_eq!(diary.records()[0].id, id);
    assert_eq!(
        diary.next_vaccination(),
        NaiveDate::from_ymd_opt(2023, 7, 31)
    );

    assert_matches!(
        diary.add_health_record(date, HealthKind::Other, "\n"),
        Err(StoreError::EmptyContent { .. })
    );
    assert_matches!(
        diary.edit_profile(ProfileField::Breed, ""),
        Err(StoreError::EmptyContent { .. })
    );
    assert_eq!(diary.profile().breed, "Golden Retriever");
}

#[test]
fn facility_filters_combine_query_and_category() {
    let directory = FacilityDirectory::new(seed::facilities());
    let mut filter = FacilityFilter {
        query: "daengdaeng".into(),
        category: None,
    };
    assert_eq!(directory.filter(&filter).len(), 2);

    filter.category = Some(Category::Cafe);
    let hits = directory.filter(&filter);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].category, Category::Cafe);

    filter.category = Some(Category::Hotel);
    assert!(directory.filter(&filter).is_empty());
}

#[test]
fn favorites_follow_toggles() {
    let mut directory = FacilityDirectory::new(seed::facilities());
    let before = directory.favorites().len();
    let id = directory
        .list()
        .iter()
        .find(|f| !f.is_favorite)
        .map(|f| f.id)
        .unwrap();

    assert_eq!(directory.toggle_favorite(id), Ok(true));
    assert_eq!(directory.favorites().len(), before + 1);
    assert_eq!(directory.toggle_favorite(id), Ok(false));
    assert_eq!(directory.favorites().len(), before);
}

#[test]
fn community_round_trip_through_tabs() {
    let mut feed = feed();
    let now = Local::now();

    let post_id = feed.create_post("Any tips for a shy rescue?", now).unwrap().id;
    assert_eq!(feed.view(FeedTab::Latest, "")[0].id, post_id);
    assert!(feed.view(FeedTab::Questions, "").iter().all(|p| p.id != post_id));
    assert_eq!(
        feed.get(post_id).unwrap().tags,
        DEFAULT_POST_TAGS.map(String::from).to_vec()
    );

    let popular = feed.view(FeedTab::Popular, "");
    assert!(popular.windows(2).all(|w| w[0].likes >= w[1].likes));

    assert_eq!(feed.toggle_like(post_id), Ok(true));
    assert_eq!(feed.get(post_id).unwrap().likes, 1);

    let comment = feed.add_comment(post_id, "Patience and treats", now).unwrap();
    assert_eq!(comment.author, *feed.me());
    assert_eq!(feed.get(post_id).unwrap().comments, vec![comment]);

    assert!(feed.search("shy rescue").iter().any(|p| p.id == post_id));
    assert!(feed.search("no such words anywhere").is_empty());
}

#[test]
fn unknown_post_is_not_found() {
    let mut feed = feed();
    let err = feed
        .add_comment(Id::UNASSIGNED, "hi", Local::now())
        .unwrap_err();
    assert!(err.is_not_found());
    assert_matches!(
        feed.toggle_like(Id::UNASSIGNED),
        Err(StoreError::NotFound { entity: "post", .. })
    );
}
