use std::collections::VecDeque;

use valuemapper::{ConversionRule, MapError, Mapper};

use crate::fixtures::*;

fn text(value: &str) -> EnumText {
  EnumText {
    enum_value: value.to_owned(),
  }
}

#[test]
fn test_enum_from_text_any_case() {
  for value in ["value1", "Value1", "VALUE1", "  vAlUe1 "] {
    let holder = valuemapper::map::<EnumText, EnumHolder>(&text(value)).unwrap();
    assert_eq!(holder.enum_value, Level::Value1, "{:?}", value);
  }
}

#[test]
fn test_enum_from_unknown_text_fails() {
  let err = valuemapper::map::<EnumText, EnumHolder>(&text("NotAMember")).unwrap_err();
  match err {
    MapError::UnknownEnumMember { enum_name, value } => {
      assert!(enum_name.ends_with("Level"));
      assert_eq!(value, "NotAMember");
    }
    other => panic!("unexpected error: {:?}", other),
  }
}

#[test]
fn test_enum_from_empty_or_null_text_is_zero_member() {
  let holder = valuemapper::map::<EnumText, EnumHolder>(&text("")).unwrap();
  assert_eq!(holder.enum_value, Level::None);

  let holder = valuemapper::map::<EnumText, EnumHolder>(&text("   ")).unwrap();
  assert_eq!(holder.enum_value, Level::None);

  let holder =
    valuemapper::map::<MaybeEnumText, EnumHolder>(&MaybeEnumText { enum_value: None }).unwrap();
  assert_eq!(holder.enum_value, Level::None);
}

#[test]
fn test_unknown_member_fails_the_batch() {
  let items = vec![text("Value2"), text("bogus"), text("High")];
  let err = valuemapper::map_list::<EnumText, EnumHolder>(&items[..]).unwrap_err();
  assert!(matches!(err, MapError::UnknownEnumMember { .. }));
}

#[test]
fn test_numeric_widening() {
  let wide = valuemapper::map::<Int32Value, Int64Value>(&Int32Value { value: 42 }).unwrap();
  assert_eq!(wide.value, 42i64);

  let single = valuemapper::map::<DoubleValue, SingleValue>(&DoubleValue { value: 3.14 }).unwrap();
  assert_eq!(single.value, 3.14f32);
}

#[test]
fn test_numeric_failures_become_zero() {
  let byte = valuemapper::map::<Int32Value, ByteValue>(&Int32Value { value: 300 }).unwrap();
  assert_eq!(byte.value, 0);

  let parsed = valuemapper::map::<TextValue, Int32Value>(&TextValue {
    value: "12a".to_owned(),
  })
  .unwrap();
  assert_eq!(parsed.value, 0);

  let parsed = valuemapper::map::<TextValue, Int32Value>(&TextValue {
    value: " -12 ".to_owned(),
  })
  .unwrap();
  assert_eq!(parsed.value, -12);

  let rendered = valuemapper::map::<DoubleValue, TextValue>(&DoubleValue { value: 0.25 }).unwrap();
  assert_eq!(rendered.value, "0.25");
}

#[test]
fn test_mixed_rules() {
  let source = Mixed {
    level: 2,
    rank: Level::High,
    flag: "True".to_owned(),
    initial: "Z".to_owned(),
    amount: "not a number".to_owned(),
  };
  let view = valuemapper::map::<Mixed, MixedView>(&source).unwrap();
  assert_eq!(
    view,
    MixedView {
      level: Level::Value2,
      rank: 10,
      flag: true,
      initial: 'Z',
      amount: Some(0.0),
    }
  );
}

#[test]
fn test_rules_in_plan() {
  let mapper = Mapper::default();
  let plan = mapper.plan::<Mixed, MixedView>();
  let rules: Vec<_> = plan.steps().iter().map(|s| (s.name(), s.rule())).collect();
  assert_eq!(
    rules,
    [
      ("level", ConversionRule::EnumFromNumber),
      ("rank", ConversionRule::EnumToNumber),
      ("flag", ConversionRule::Coerce),
      ("initial", ConversionRule::Coerce),
      ("amount", ConversionRule::Nullable),
    ]
  );
  assert!(plan.step("amount").unwrap().accepts_absent());
  assert!(!plan.step("rank").unwrap().accepts_absent());
}

#[test]
fn test_collections() {
  let source = Collections {
    tags: vec!["a".to_owned(), "b".to_owned()],
    scores: vec![1, 2, 3],
    history: vec![4u8, 5].into_boxed_slice(),
    location: Some(Coordinates { lat: 1.0, lon: 2.0 }),
  };
  let mapper = Mapper::default();
  let view = mapper.map::<Collections, CollectionsView>(&source).unwrap();
  assert_eq!(
    view,
    CollectionsView {
      tags: VecDeque::from(vec!["a".to_owned(), "b".to_owned()]),
      scores: Vec::new(),
      history: vec![4, 5],
      location: Some(Coordinates { lat: 1.0, lon: 2.0 }),
    }
  );
  assert_eq!(
    mapper.plan::<Collections, CollectionsView>().step_names(),
    ["tags", "history", "location"]
  );
  assert_eq!(
    mapper.plan::<Collections, CollectionsView>().step("tags").unwrap().rule(),
    ConversionRule::SequenceCopy
  );
}

#[test]
fn test_collections_inside_option() {
  let source = TagLists {
    tags: vec!["a".to_owned()],
    extra: Some(vec!["b".to_owned(), "c".to_owned()]),
    missing: None,
    counts: Some(vec![1, 2]),
  };
  let mapper = Mapper::default();
  let queues = mapper.map::<TagLists, TagQueues>(&source).unwrap();
  assert_eq!(
    queues,
    TagQueues {
      tags: Some(VecDeque::from(vec!["a".to_owned()])),
      extra: Some(VecDeque::from(vec!["b".to_owned(), "c".to_owned()])),
      missing: Vec::new(),
      counts: None,
    }
  );

  let plan = mapper.plan::<TagLists, TagQueues>();
  assert_eq!(plan.step_names(), ["tags", "extra", "missing"]);
  assert!(plan
    .steps()
    .iter()
    .all(|step| step.rule() == ConversionRule::SequenceCopy));
  assert!(!plan.step("missing").unwrap().accepts_absent());

  let empty = mapper
    .map::<TagLists, TagQueues>(&TagLists::default())
    .unwrap();
  assert_eq!(empty.tags, Some(VecDeque::new()));
  assert_eq!(empty.extra, None);
}
