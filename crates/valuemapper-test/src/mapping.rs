use valuemapper::{MapError, Mapper};

use crate::fixtures::*;

#[test]
fn test_identity() {
  let source = person(3);
  let record: PersonRecord = valuemapper::map::<Person, PersonRecord>(&source).unwrap();
  assert_eq!(record.id, source.id);
  assert_eq!(record.name, source.name);
  assert_eq!(record.email, source.email);
  assert_eq!(record.score, source.score);
  assert_eq!(record.level, source.level);
}

#[test]
fn test_round_trip() {
  let mapper = Mapper::default();
  let source = person(8);
  let record = mapper.map::<Person, PersonRecord>(&source).unwrap();
  let back = mapper.map::<PersonRecord, Person>(&record).unwrap();
  assert_eq!(back, source);
}

#[test]
fn test_null_source() {
  let err = valuemapper::map::<Person, PersonRecord>(None::<&Person>).unwrap_err();
  assert_eq!(err, MapError::NullArgument { argument: "source" });
}

#[test]
fn test_rename_ignore_and_coercion() {
  let summary = valuemapper::map::<Person, PersonSummary>(&person(4)).unwrap();
  assert_eq!(
    summary,
    PersonSummary {
      id: 4,
      display_name: "person-4".to_owned(),
      email: None,
      level: "Value1".to_owned(),
    }
  );
}

#[test]
fn test_ignore_annotation_wins_over_runtime_set() {
  let mapper = Mapper::default();
  let summary = mapper
    .map_ignoring::<Person, PersonSummary>(&person(5), &["id"])
    .unwrap();
  assert_eq!(summary.id, 0);
  assert_eq!(summary.email, None);
  assert_eq!(summary.display_name, "person-5");
}

#[test]
fn test_runtime_ignore_set() {
  let mapper = Mapper::default();
  let record = mapper
    .map_ignoring::<Person, PersonRecord>(&person(6), &["name", "score", "unknown"])
    .unwrap();
  assert_eq!(record.id, 6);
  assert_eq!(record.name, "");
  assert_eq!(record.score, 0.0);
  assert_eq!(record.email.as_deref(), Some("p6@example.com"));

  let plain = mapper.map::<Person, PersonRecord>(&person(6)).unwrap();
  assert_eq!(plain, mapper.map::<Person, PersonRecord>(&person(6)).unwrap());
  assert_eq!(plain.name, "person-6");
}

#[test]
fn test_rename_on_source() {
  let source = Labelled {
    label: "Chapter".to_owned(),
    id: 1,
  };
  let heading = valuemapper::map::<Labelled, Heading>(&source).unwrap();
  assert_eq!(
    heading,
    Heading {
      title: "Chapter".to_owned(),
      id: 1
    }
  );
}

#[test]
fn test_rename_on_source_ignores_case() {
  let source = ShoutedLabel {
    label: "Appendix".to_owned(),
    id: 2,
  };
  let heading = valuemapper::map::<ShoutedLabel, Heading>(&source).unwrap();
  assert_eq!(
    heading,
    Heading {
      title: "Appendix".to_owned(),
      id: 2
    }
  );
}

#[test]
fn test_rename_on_destination_is_exact() {
  let mapper = Mapper::default();
  let mapped = mapper.map::<Person, MissingRename>(&person(9)).unwrap();
  assert_eq!(mapped, MissingRename::default());
  assert!(mapper.plan::<Person, MissingRename>().steps().is_empty());
}

#[test]
fn test_names_match_case_insensitively() {
  let shouting = valuemapper::map::<Person, ShoutingPerson>(&person(2)).unwrap();
  assert_eq!(shouting.ID, 2);
  assert_eq!(shouting.NAME, "person-2");

  let back = valuemapper::map::<ShoutingPerson, PersonRecord>(&shouting).unwrap();
  assert_eq!(back.id, 2);
  assert_eq!(back.name, "person-2");
}

#[test]
fn test_inaccessible_fields_are_left_alone() {
  let mapper = Mapper::default();
  let restricted = mapper.map::<Person, Restricted>(&person(11)).unwrap();
  assert_eq!(restricted.id, 11);
  assert_eq!(restricted.name, "unset");
  assert_eq!(restricted.score(), -1.0);
  assert_eq!(mapper.plan::<Person, Restricted>().step_names(), ["id"]);
}

#[test]
fn test_null_handling() {
  let mapper = Mapper::default();
  let empty = Nullable {
    count: None,
    note: None,
  };
  let mapped = mapper.map::<Nullable, Defaults>(&empty).unwrap();
  assert_eq!(mapped.count, 7);
  assert_eq!(mapped.note, None);

  let full = Nullable {
    count: Some(3),
    note: Some("hi".to_owned()),
  };
  let mapped = mapper.map::<Nullable, Defaults>(&full).unwrap();
  assert_eq!(
    mapped,
    Defaults {
      count: 3,
      note: Some("hi".to_owned())
    }
  );
}

#[test]
fn test_types_without_fields() {
  let unit = valuemapper::map::<Person, Unit>(&person(1));
  assert!(unit.is_ok());
  let record = valuemapper::map::<Unit, PersonRecord>(&Unit).unwrap();
  assert_eq!(record, PersonRecord::default());
}

#[test]
fn test_generic_struct() {
  let source = Wrapper {
    value: 41i32,
    label: "answer".to_owned(),
  };
  let wide = valuemapper::map::<Wrapper<i32>, Wrapper<i64>>(&source).unwrap();
  assert_eq!(
    wide,
    Wrapper {
      value: 41i64,
      label: "answer".to_owned(),
    }
  );

  let text = valuemapper::map::<Wrapper<i32>, Wrapper<String>>(&source).unwrap();
  assert_eq!(text.value, "41");
}
