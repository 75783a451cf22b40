use valuemapper::{MapError, Mapper, MapperConfig, DEFAULT_PARALLEL_THRESHOLD};

use crate::fixtures::*;

fn people(count: i32) -> Vec<Person> {
  (0..count).map(person).collect()
}

fn small_batches() -> Mapper {
  Mapper::new(
    MapperConfig::default()
      .parallel_threshold(16)
      .max_parallelism(4),
  )
}

#[test]
fn test_null_and_empty_batches() {
  let err = valuemapper::map_list::<Person, PersonRecord>(None::<&[Person]>).unwrap_err();
  assert!(matches!(err, MapError::NullArgument { argument: "sources" }));

  let empty: Vec<Person> = Vec::new();
  let out = valuemapper::map_list::<Person, PersonRecord>(&empty[..]).unwrap();
  assert!(out.is_empty());
}

#[test]
fn test_slice_forms() {
  let input = people(3);
  let from_slice = valuemapper::map_list::<Person, PersonRecord>(input.as_slice()).unwrap();
  let from_some = valuemapper::map_list::<Person, PersonRecord>(Some(&input[..])).unwrap();
  assert_eq!(from_slice, from_some);
  assert_eq!(from_slice[2].name, "person-2");
}

#[test]
fn test_order_around_threshold() {
  let mapper = small_batches();
  for count in [1, 15, 16, 17, 100] {
    let input = people(count);
    let out = mapper.map_list::<Person, PersonRecord>(&input[..]).unwrap();
    assert_eq!(out.len(), input.len());
    for (source, record) in input.iter().zip(out.iter()) {
      assert_eq!(record.id, source.id);
      assert_eq!(record.name, source.name);
      assert_eq!(record.level, source.level);
    }
  }
}

#[test]
fn test_default_threshold() {
  let count = DEFAULT_PARALLEL_THRESHOLD as i32 + 1;
  let input = people(count);
  let out = valuemapper::map_list::<Person, PersonSummary>(&input[..]).unwrap();
  let ids: Vec<i64> = out.iter().map(|s| s.id).collect();
  let expected: Vec<i64> = (0..i64::from(count)).collect();
  assert_eq!(ids, expected);
  assert_eq!(out[3].level, "High");
  assert_eq!(out[4].level, "Value1");
}

#[test]
fn test_ignored_in_batch() {
  let mapper = small_batches();
  let input = people(40);
  let out = mapper.map_list_ignoring::<Person, PersonRecord>(&input[..], &["name"]).unwrap();
  assert!(out.iter().all(|r| r.name.is_empty()));
  assert_eq!(out[39].id, 39);
}

#[test]
fn test_map_iter() {
  let mapper = small_batches();
  let input = people(50);
  let odd = input.iter().filter(|p| p.id % 2 == 1);
  let out: Vec<PersonRecord> = mapper.map_iter(odd, &["email"]).unwrap();
  assert_eq!(out.len(), 25);
  assert_eq!(out[0].id, 1);
  assert_eq!(out[24].id, 49);
  assert!(out.iter().all(|r| r.email.is_none() && r.level == Level::High));
}

#[test]
fn test_fatal_error_in_parallel_batch() {
  let mapper = small_batches();
  let mut input: Vec<EnumText> = (0..64)
    .map(|_| EnumText {
      enum_value: "value2".to_owned(),
    })
    .collect();
  input[37].enum_value = "Bogus".to_owned();

  let err = mapper.map_list::<EnumText, EnumHolder>(&input[..]).unwrap_err();
  assert!(matches!(err, MapError::UnknownEnumMember { ref value, .. } if value == "Bogus"));

  input[37].enum_value = "HIGH".to_owned();
  let out = mapper.map_list::<EnumText, EnumHolder>(&input[..]).unwrap();
  assert_eq!(out[37].enum_value, Level::High);
  assert_eq!(out[36].enum_value, Level::Value2);
}
