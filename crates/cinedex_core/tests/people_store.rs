use cinedex_core::{
    open_pool_in_memory, Actor, Director, ErrorKind, Filters, ListCriteria, Models,
    RecordRepository, RepoError, StoreConfig, ACTOR_SORT_SAFELIST, DIRECTOR_SORT_SAFELIST,
    MOVIE_SORT_SAFELIST,
};

fn models() -> Models {
    let pool = open_pool_in_memory().unwrap();
    Models::new(pool, &StoreConfig::in_memory())
}

fn names<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    values.into_iter().collect()
}

#[test]
fn actor_crud_round_trip() {
    let models = models();
    let mut actor = Actor::new("Ingrid", "Bergman");

    models.actors.insert(&mut actor).unwrap();
    assert!(actor.id > 0);
    assert_eq!(actor.version, 1);
    assert_eq!(models.actors.get(actor.id).unwrap(), actor);

    actor.surname = "Bergman-Rossellini".to_string();
    models.actors.update(&mut actor).unwrap();
    assert_eq!(actor.version, 2);
    assert_eq!(
        models.actors.get(actor.id).unwrap().surname,
        "Bergman-Rossellini"
    );

    models.actors.delete(actor.id).unwrap();
    assert!(models.actors.get(actor.id).unwrap_err().is_not_found());
}

#[test]
fn actor_requires_name_and_surname() {
    let models = models();
    let mut actor = Actor::new(" ", "x".repeat(501));

    let RepoError::Validation(errors) = models.actors.insert(&mut actor).unwrap_err() else {
        panic!("expected validation error");
    };
    assert_eq!(errors.field("name"), Some("must be provided"));
    assert_eq!(
        errors.field("surname"),
        Some("must not be more than 500 bytes long")
    );
}

#[test]
fn actor_search_and_sort() {
    let models = models();
    for (name, surname) in [("Max", "von Sydow"), ("Bibi", "Andersson"), ("Max", "Ophüls")] {
        models
            .actors
            .insert(&mut Actor::new(name, surname))
            .unwrap();
    }

    let max = models
        .actors
        .get_all(
            &ListCriteria::all().with_search("max"),
            &Filters::new(1, 20, "-surname", ACTOR_SORT_SAFELIST),
        )
        .unwrap();
    assert_eq!(
        max.records
            .iter()
            .map(|actor| actor.surname.as_str())
            .collect::<Vec<_>>(),
        names(["von Sydow", "Ophüls"])
    );
    assert_eq!(max.metadata.total_records, 2);
}

#[test]
fn actor_listing_rejects_set_filters() {
    let models = models();
    let err = models
        .actors
        .get_all(
            &ListCriteria::all().with_contains(["oscar"]),
            &Filters::first_page(ACTOR_SORT_SAFELIST),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn actor_listing_rejects_sorts_from_another_safelist() {
    let models = models();
    let err = models
        .actors
        .get_all(
            &ListCriteria::all(),
            &Filters::new(1, 20, "title", MOVIE_SORT_SAFELIST),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let RepoError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.field("sort"), Some("invalid sort value"));
}

#[test]
fn actors_sort_by_version() {
    let models = models();
    let mut edited = Actor::new("Peter", "Lorre");
    let mut untouched = Actor::new("Sydney", "Greenstreet");
    models.actors.insert(&mut edited).unwrap();
    models.actors.insert(&mut untouched).unwrap();

    edited.name = "Laszlo".to_string();
    models.actors.update(&mut edited).unwrap();

    let listing = models
        .actors
        .get_all(
            &ListCriteria::all(),
            &Filters::new(1, 20, "-version", ACTOR_SORT_SAFELIST),
        )
        .unwrap();
    let ids = listing.records.iter().map(|actor| actor.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![edited.id, untouched.id]);
}

#[test]
fn actor_sort_safelist_excludes_movie_columns() {
    let models = models();
    let err = models
        .actors
        .get_all(
            &ListCriteria::all(),
            &Filters::new(1, 20, "year", ACTOR_SORT_SAFELIST),
        )
        .unwrap_err();
    let RepoError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.field("sort"), Some("invalid sort value"));
}

#[test]
fn director_awards_round_trip_and_filter() {
    let models = models();
    let mut kurosawa = Director::new("Akira", "Kurosawa", ["Oscar", "Golden Lion"]);
    let mut bergman = Director::new("Ingmar", "Bergman", ["Oscar"]);
    let mut tarr = Director::new("Béla", "Tarr", Vec::<String>::new());
    for director in [&mut kurosawa, &mut bergman, &mut tarr] {
        models.directors.insert(director).unwrap();
    }

    assert_eq!(models.directors.get(kurosawa.id).unwrap(), kurosawa);
    assert!(models.directors.get(tarr.id).unwrap().awards.is_empty());

    let oscar = models
        .directors
        .get_all(
            &ListCriteria::all().with_contains(["Oscar"]),
            &Filters::new(1, 20, "surname", DIRECTOR_SORT_SAFELIST),
        )
        .unwrap();
    assert_eq!(
        oscar
            .records
            .iter()
            .map(|director| director.surname.as_str())
            .collect::<Vec<_>>(),
        names(["Bergman", "Kurosawa"])
    );

    let both = models
        .directors
        .get_all(
            &ListCriteria::all().with_contains(["Golden Lion", "Oscar"]),
            &Filters::first_page(DIRECTOR_SORT_SAFELIST),
        )
        .unwrap();
    assert_eq!(both.records, vec![kurosawa]);
}

#[test]
fn director_update_is_version_checked() {
    let models = models();
    let mut director = Director::new("Agnès", "Varda", ["César"]);
    models.directors.insert(&mut director).unwrap();

    let mut stale = director.clone();
    director.awards.push("Palme d'honneur".to_string());
    models.directors.update(&mut director).unwrap();
    assert_eq!(director.version, 2);

    stale.awards.clear();
    assert!(models.directors.update(&mut stale).unwrap_err().is_edit_conflict());
    assert_eq!(
        models.directors.get(director.id).unwrap().awards,
        vec!["César", "Palme d'honneur"]
    );
}

#[test]
fn director_awards_must_be_unique_and_non_blank() {
    let models = models();
    let mut director = Director::new("Wong", "Kar-wai", ["Cannes", "Cannes", " "]);

    let RepoError::Validation(errors) = models.directors.insert(&mut director).unwrap_err()
    else {
        panic!("expected validation error");
    };
    assert!(errors.field("awards").is_some());
    assert_eq!(director.id, 0);
}
