use super::*;
use serde_json::json;

#[test]
fn part_keys_parse_in_several_spellings() {
    assert_eq!("tailTip".parse::<PartKey>().unwrap(), PartKey::TailTip);
    assert_eq!("tail-tip".parse::<PartKey>().unwrap(), PartKey::TailTip);
    assert_eq!("EYE_BASE".parse::<PartKey>().unwrap(), PartKey::EyeBase);
    assert!("whiskers".parse::<PartKey>().is_err());
}

#[test]
fn part_values_parse_patterns_hex_and_decimal() {
    assert_eq!(
        "orangeStripes".parse::<PartValue>().unwrap(),
        PartValue::Pattern(Pattern::OrangeStripes)
    );
    assert_eq!(
        "#0000ff".parse::<PartValue>().unwrap(),
        PartValue::Color(Rgb::new(0x0000ff))
    );
    assert_eq!(
        "255".parse::<PartValue>().unwrap(),
        PartValue::Color(Rgb::new(0x0000ff))
    );
    assert!("plaid".parse::<PartValue>().is_err());
    assert!("99999999".parse::<PartValue>().is_err());
}

#[test]
fn patterns_are_only_valid_on_their_part() {
    let stripes = PartValue::Pattern(Pattern::OrangeStripes);
    assert_eq!(TailStyle::try_from(stripes).unwrap(), TailStyle::OrangeStripes);
    assert!(EyeStyle::try_from(stripes).is_err());
    assert!(NoseStyle::try_from(stripes).is_err());

    let split = PartValue::Pattern(Pattern::GreenBlueSplit);
    assert_eq!(EyeStyle::try_from(split).unwrap(), EyeStyle::GreenBlueSplit);
    assert!(TailStyle::try_from(split).is_err());
}

#[test]
fn tagged_styles_serialize_as_number_or_tag() {
    assert_eq!(
        serde_json::to_value(TailStyle::Solid(Rgb::new(1))).unwrap(),
        json!(1)
    );
    assert_eq!(
        serde_json::to_value(TailStyle::GreyStripes).unwrap(),
        json!("greyStripes")
    );
    let nose: NoseStyle = serde_json::from_value(json!("halfBlackGrey")).unwrap();
    assert_eq!(nose, NoseStyle::HalfBlackGrey);
    assert!(serde_json::from_value::<NoseStyle>(json!("orangeStripes")).is_err());
}

#[test]
fn accessory_tags_roundtrip() {
    for a in Accessory::ALL {
        assert_eq!(a.tag().parse::<Accessory>().unwrap(), a);
    }
    assert!("monocle".parse::<Accessory>().is_err());
    assert_eq!(
        serde_json::to_value(Accessory::TopHat).unwrap(),
        json!("topHat")
    );
}
