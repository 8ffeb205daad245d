//! End-to-end queries over a realistic router configuration

use confparse::{
    compile, parse_path, BlockAnnotation, ConfigTree, Literal, ParseOptions, Predicate,
};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn router() -> ConfigTree {
    parse_path(fixture("router.conf"), &ParseOptions::default()).unwrap()
}

const SERIAL: &str = "\
interface Serial1/0
 encapsulation ppp
 ip address 1.1.1.1 255.255.255.252
!
access-list 101 deny tcp any any eq 25 log
access-list 101 permit ip any any
";

#[test]
fn serial_interface_queries() {
    let tree = ConfigTree::from_text(SERIAL, &ParseOptions::default()).unwrap();
    let q = tree.query();
    let interface = compile("interface").unwrap();
    let expected = vec![
        "interface Serial1/0",
        " encapsulation ppp",
        " ip address 1.1.1.1 255.255.255.252",
    ];

    assert_eq!(q.find_children(&interface), expected);
    assert_eq!(q.find_all_children(&interface), expected);
    assert_eq!(
        q.find_parents_without_child(&interface, &compile("shutdown").unwrap()),
        vec!["interface Serial1/0"]
    );
}

#[test]
fn banner_children_stop_at_comment() {
    let text = "\
banner motd ^C
No unauthorized access
  Violators prosecuted
^C
!
hostname r1
";
    let tree = ConfigTree::from_text(text, &ParseOptions::default()).unwrap();
    assert_eq!(
        tree.query().find_children(&compile("banner motd").unwrap()),
        vec![
            "banner motd ^C",
            "No unauthorized access",
            "  Violators prosecuted",
            "^C",
        ]
    );
}

#[test]
fn every_line_is_kept_in_order() {
    let tree = router();
    assert_eq!(tree.len(), 40);
    assert_eq!(tree.lines()[0].text(), "!");
    assert_eq!(tree.lines()[39].text(), "end");
    for (i, line) in tree.lines().iter().enumerate() {
        assert_eq!(line.index(), i);
    }
}

#[test]
fn interface_children() {
    let tree = router();
    let lines = tree.query().find_children(&compile(r"^interface Serial").unwrap());
    assert_eq!(
        lines,
        vec![
            "interface Serial1/0",
            " encapsulation ppp",
            " ip address 1.1.1.1 255.255.255.252",
        ]
    );
}

#[test]
fn bgp_address_family_nesting() {
    let tree = router();
    let q = tree.query();

    assert_eq!(
        q.find_children(&compile(r"^router bgp").unwrap()),
        vec![
            "router bgp 65000",
            " neighbor 10.0.0.2 remote-as 65001",
            " address-family ipv4",
            " exit-address-family",
        ]
    );
    assert_eq!(
        q.find_all_children(&compile(r"address-family ipv4").unwrap()),
        vec![
            " address-family ipv4",
            "  network 192.0.2.0 mask 255.255.255.0",
            "  neighbor 10.0.0.2 activate",
        ]
    );
}

#[test]
fn family_endpoints_point_at_next_top_level_line() {
    let tree = router();
    let serial = tree.line(11).unwrap();
    assert!(serial.is_oldest_ancestor());
    assert_eq!(serial.family_endpoint(), Some(15));

    let bgp = tree.line(21).unwrap();
    assert_eq!(bgp.family_endpoint(), Some(28));

    // nested lines resolve through their oldest ancestor
    assert_eq!(tree.family_endpoint_of(25).unwrap(), 28);
}

#[test]
fn banner_motd_is_folded() {
    let tree = router();
    assert!(tree.annotations().contains(&BlockAnnotation::Annotated {
        name: "banner motd".into(),
        start: 31,
        end: 35,
    }));

    let lines = tree.query().find_children(&compile(r"^banner motd").unwrap());
    assert_eq!(
        lines,
        vec![
            "banner motd ^C",
            "Authorized access only.",
            "  All activity is logged.",
            "^C",
        ]
    );

    // the indented banner text belongs to the banner, not the line above it
    let logged = tree.line(33).unwrap();
    assert_eq!(logged.parent(), Some(31));
    let above = tree.line(32).unwrap();
    assert!(!above.is_oldest_ancestor());
    assert!(above.children().is_empty());
}

#[test]
fn missing_banner_kinds_are_reported() {
    let tree = router();
    let not_found: Vec<&str> = tree
        .annotations()
        .iter()
        .filter(|a| matches!(a, BlockAnnotation::NotFound { .. }))
        .map(BlockAnnotation::name)
        .collect();
    assert_eq!(not_found.len(), 3);
    assert!(!not_found.contains(&"banner motd"));
}

#[test]
fn blocks_include_siblings_and_ancestors() {
    let tree = router();
    let lines = tree.query().find_blocks(&compile(r"activate").unwrap());
    assert_eq!(
        lines,
        vec![
            "router bgp 65000",
            " address-family ipv4",
            "  network 192.0.2.0 mask 255.255.255.0",
            "  neighbor 10.0.0.2 activate",
        ]
    );
}

#[test]
fn interfaces_missing_shutdown() {
    let tree = router();
    let interface = compile(r"^interface").unwrap();
    let lines = tree
        .query()
        .find_parents_without_child(&interface, &compile(r"shutdown").unwrap());
    assert_eq!(lines, vec!["interface Serial1/0"]);
}

#[test]
fn parents_of_service_policy() {
    let tree = router();
    let lines = tree.query().find_parents_with_child(
        &compile(r"^interface").unwrap(),
        &compile(r"service-policy").unwrap(),
    );
    assert_eq!(lines, vec!["interface GigabitEthernet0/1"]);
}

#[test]
fn literal_and_predicate_matchers() {
    let tree = router();
    let q = tree.query();

    assert_eq!(
        q.find_lines(&Literal::new("remote-as")),
        vec![" neighbor 10.0.0.2 remote-as 65001"]
    );

    let deep = Predicate::new(|text: &str| text.starts_with("  ") && text.contains("neighbor"));
    assert_eq!(q.find_lines(&deep), vec!["  neighbor 10.0.0.2 activate"]);
}

#[test]
fn indentation_only_leaves_banner_text_alone() {
    let tree = parse_path(fixture("router.conf"), &ParseOptions::indentation_only()).unwrap();
    assert!(tree.annotations().is_empty());
    assert!(tree.line(31).unwrap().children().is_empty());
    assert_eq!(tree.line(33).unwrap().parent(), Some(32));
}
