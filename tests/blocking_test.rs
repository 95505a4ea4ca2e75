mod common;

use common::fake_transport::{test_config, FakeTransport};
use common::fixtures::{self, CharacterPage, CHARACTER_ID, CHARACTER_NAME, FC_ID, WORLD};
use ffxiv_scraper::blocking::Lodestone;

fn site() -> FakeTransport {
    FakeTransport::new()
        .page(
            &format!("character/{}/", CHARACTER_ID),
            fixtures::classic_character(&CharacterPage::default()),
        )
        .page(
            &format!("character/{}/achievement/kind/13/?filter=2", CHARACTER_ID),
            fixtures::achievement_page(&[1], 1),
        )
        .page(&format!("freecompany/{}/", FC_ID), fixtures::fc_profile_page())
        .page(
            &format!("freecompany/{}/member/", FC_ID),
            fixtures::fc_member_page(1, 2, 50),
        )
        .page(
            &format!("freecompany/{}/member/?page=2", FC_ID),
            fixtures::fc_member_page(2, 2, 5),
        )
        .page("topics/", fixtures::topics_page())
}

#[test]
fn blocking_client_runs_without_caller_runtime() {
    let client = Lodestone::with_transport(site(), test_config()).unwrap();

    let character = client.scrape_character(CHARACTER_ID).unwrap();
    assert_eq!(character.name, CHARACTER_NAME);
    assert_eq!(character.server, WORLD);
    assert_eq!(character.achievements.len(), 1);

    let fc = client.scrape_free_company(FC_ID).unwrap();
    assert_eq!(fc.roster.len(), 55);

    assert_eq!(client.scrape_topics().unwrap().len(), 2);
}

#[test]
fn blocking_client_reports_missing_character() {
    let client = Lodestone::with_transport(site(), test_config()).unwrap();
    let err = client.scrape_character("404").unwrap_err();
    assert!(err.is_does_not_exist());
}
