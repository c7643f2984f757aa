use zipcodetw::directory::{Directory, InMemoryStore};

const SAMPLE_CSV: &str = "\
zipcode,addr_a,addr_b,rule\n\
100,臺北市,中正區,全\n\
10041,臺北市中正區忠孝東路,1段,1號至50號\n\
10059,臺北市中正區忠孝東路,2段,全\n\
";

fn loaded_directory() -> Directory<InMemoryStore> {
    let mut dir = Directory::new(InMemoryStore::new());
    let rows = dir.load(SAMPLE_CSV.as_bytes()).expect("sample csv loads cleanly");
    assert_eq!(rows, 3);
    dir
}

#[test_log::test]
fn precise_rule_resolves_a_specific_street_segment() {
    let mut dir = loaded_directory();
    assert_eq!(dir.find("臺北市中正區忠孝東路1段5號").unwrap(), "10041");
}

#[test]
fn out_of_range_house_number_degrades_to_district_level() {
    let mut dir = loaded_directory();
    // 100號 falls outside the 1號至50號 rule, so the lookup degrades past the precise
    // index down to the district-level gradual entry shared by the whole row.
    assert_eq!(dir.find("臺北市中正區忠孝東路1段100號").unwrap(), "100");
}

#[test]
fn whole_segment_rule_matches_every_house_number() {
    let mut dir = loaded_directory();
    assert_eq!(dir.find("臺北市中正區忠孝東路2段999號").unwrap(), "10059");
}

#[test]
fn unrelated_city_misses_entirely() {
    let mut dir = loaded_directory();
    assert_eq!(dir.find("高雄市前金區").unwrap(), "");
}

#[test]
fn misordered_leading_tokens_still_resolve() {
    // StandardAddress reorders 市/區 into canonical order even when the raw input omits or
    // reorders them, so a slightly malformed query still finds the same row.
    let mut dir = loaded_directory();
    assert_eq!(dir.find("中正區臺北市忠孝東路1段5號").unwrap(), "10041");
}

#[test]
fn alternate_tai_spelling_normalizes_before_lookup() {
    let mut dir = loaded_directory();
    assert_eq!(dir.find("台北市中正區忠孝東路1段5號").unwrap(), "10041");
}
