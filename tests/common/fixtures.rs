#![allow(dead_code)]

//! Lodestone page bodies for tests, shaped like the live markup.

pub const CHARACTER_ID: &str = "1234567";
pub const CHARACTER_NAME: &str = "Alys Doe";
pub const WORLD: &str = "Gilgamesh";
pub const FC_ID: &str = "9233645873504779210";
pub const DOMAIN: &str = "na.finalfantasyxiv.com";

/// Knobs for the classic character page.
#[derive(Debug, Clone)]
pub struct CharacterPage {
    pub id: String,
    /// Id the profile tab links to; differs from `id` for a foreign page.
    pub link_id: String,
    pub name: String,
    pub world: String,
    pub introduction: String,
    /// Without it the page has no self-introduction block at all.
    pub with_introduction: bool,
    pub with_title: bool,
    pub with_grand_company: bool,
}

impl Default for CharacterPage {
    fn default() -> Self {
        Self {
            id: CHARACTER_ID.to_string(),
            link_id: CHARACTER_ID.to_string(),
            name: CHARACTER_NAME.to_string(),
            world: WORLD.to_string(),
            introduction: "Hello from Eorzea".to_string(),
            with_introduction: true,
            with_title: true,
            with_grand_company: true,
        }
    }
}

pub fn classic_character(page: &CharacterPage) -> String {
    let title = if page.with_title {
        r#"<div class="chara_title">Warrior of Light</div>"#
    } else {
        ""
    };
    let grand_company = if page.with_grand_company {
        r#"<li>Grand Company <strong class="txt_yellow">Immortal Flames/Second Flame Lieutenant</strong></li>"#
    } else {
        ""
    };
    let introduction = if page.with_introduction {
        format!(
            "<div class=\"txt_selfintroduction\">\n    {}\n  </div>",
            page.introduction
        )
    } else {
        String::new()
    };

    format!(
        r##"<!DOCTYPE html>
<html><head><title>{name} | FINAL FANTASY XIV, The Lodestone</title></head>
<body>
  <ul class="tab_com_chara_header">
    <li class="tab_com_chara_header_profile tab_left"><a href="/lodestone/character/{link_id}/">Profile</a></li>
  </ul>
  <div class="player_name_txt">
    <div class="player_name_thumb"><a href="/lodestone/character/{link_id}/"><img src="//img.finalfantasyxiv.com/f/avatar_50x50.jpg"></a></div>
    <h2><a href="/lodestone/character/{link_id}/">{name}</a> <span>({world})</span></h2>
    {title}
  </div>
  <div class="bg_chara_264"><img src="//img.finalfantasyxiv.com/f/portrait_264x360.jpg"></div>
  <div class="chara_profile_title">Hyur / Midlander / ♀</div>
  <table class="chara_profile_table">
    <tr><th>Nameday </th><td><span class="txt_yellow">Moon</span> <span class="txt_yellow">15th Sun of the 3rd Umbral Moon</span></td></tr>
    <tr><th>Guardian </th><td><span class="txt_yellow">Halone, the Fury</span></td></tr>
  </table>
  <ul class="chara_profile_list">
    <li>City-state <strong class="txt_yellow">Ul'dah</strong></li>
    {grand_company}
    <li>Free Company <div class="ic_crest_32"><img src="//img/crest_a.png"><img src="//img/crest_b.png"></div>
      <a class="txt_yellow" href="/lodestone/freecompany/{fc_id}/">Seventh Heaven</a></li>
  </ul>
  <div class="bt_legacy_history"><a href="#">Legacy</a></div>
  <table class="class_list">
    <tr><td class="ic_class_wh24_box"><img src="gla.png">Gladiator</td><td>50</td><td>1,200 / 5,000</td>
        <td class="ic_class_wh24_box"><img src="pgl.png">Pugilist</td><td>-</td><td>- / -</td></tr>
    <tr><td class="ic_class_wh24_box"><img src="mrd.png">Marauder</td><td>42</td><td>10 / 2,500,000</td>
        <td class="ic_class_wh24_box"></td><td></td><td></td></tr>
  </table>
  <ul class="param_list">
    <li class="hp">3,500</li><li class="mp">2,100</li><li class="tp">1,000</li>
    <li class="str">250</li><li class="dex">180</li><li class="vit">240</li>
    <li class="int">90</li><li class="mnd">110</li><li class="pie">-</li>
  </ul>
  <ul class="element_list">
    <li class="fire"><span class="val">110</span></li><li class="ice"><span class="val">111</span></li>
    <li class="wind"><span class="val">112</span></li><li class="earth"><span class="val">113</span></li>
    <li class="thunder"><span class="val">114</span></li><li class="water"><span class="val">115</span></li>
  </ul>
  <table class="param_right_area">
    <tr><td><span class="left">Defense</span></td><td><span class="right">410</span></td></tr>
    <tr><td><span class="left">Critical Hit Rate</span></td><td><span class="right">398</span></td></tr>
  </table>
  <div class="minion_box"><h4>Minions</h4><a title="Wolf Pup" href="#"></a><a title="Cherry Bomb" href="#"></a></div>
  <div class="minion_box"><h4>Mounts</h4><a title="Company Chocobo" href="#"></a></div>
  <div class="item_list">
    <div class="item_name_right"><p class="category_name">Two-handed Marauder's Arm</p><h2 class="item_name">Bravura</h2></div>
    <div class="item_name_right"><p class="category_name">Head</p><h2 class="item_name">Darklight Helm</h2></div>
    <div class="item_name_right"><p class="category_name">Body</p></div>
    <div class="item_name_right"><p class="category_name">Ring</p><h2 class="item_name">Ring of Might</h2></div>
    <div class="item_name_right"><p class="category_name">Ring</p><h2 class="item_name">Ring of Fortune</h2></div>
    <div class="item_name_right"><p class="category_name">Soul Crystal</p><h2 class="item_name">Soul of the Warrior</h2></div>
  </div>
  {introduction}
</body></html>"##,
        name = page.name,
        world = page.world,
        link_id = page.link_id,
        title = title,
        grand_company = grand_company,
        fc_id = FC_ID,
        introduction = introduction,
    )
}

pub fn modern_character(id: &str, name: &str, world: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body>
  <div class="frame__chara">
    <a class="frame__chara__link" href="/lodestone/character/{id}/">
      <div class="frame__chara__face"><img src="//img/face.jpg"></div>
      <p class="frame__chara__title">Warrior of Light</p>
      <p class="frame__chara__name">{name}</p>
      <p class="frame__chara__world">{world} [Aether]</p>
    </a>
  </div>
  <div class="character-block">
    <div class="character-block__box">
      <p class="character-block__title">Race/Clan/Gender</p>
      <p class="character-block__name">Miqo'te<br>Seeker of the Sun / ♂</p>
    </div>
  </div>
  <div class="character-block">
    <div class="character-block__box">
      <p class="character-block__title">Nameday</p>
      <p class="character-block__birth">1st Sun of the 6th Astral Moon</p>
      <p class="character-block__title">Guardian</p>
      <p class="character-block__name">Nymeia, the Spinner</p>
    </div>
  </div>
  <div class="character-block">
    <div class="character-block__box">
      <p class="character-block__title">Grand Company</p>
      <p class="character-block__name">Maelstrom / Storm Captain</p>
    </div>
  </div>
  <div class="character__selfintroduction">Modern intro</div>
  <ul class="character__level__list">
    <li><img data-tooltip="Paladin / Gladiator" src="pld.png">90</li>
  </ul>
  <table class="character__param__list"><tr><th>Strength</th><td>2,910</td></tr></table>
</body></html>"#
    )
}

/// Pager pointing at page `pages` of `path`.
pub fn pager(path: &str, pages: usize) -> String {
    if pages <= 1 {
        return String::new();
    }
    let sep = if path.contains('?') { '&' } else { '?' };
    format!(
        r#"<ul class="pager"><li class="next"><a href="{path}{sep}page=2" rel="next">Next</a></li><li><a href="{path}{sep}page={pages}" rel="last">Last</a></li></ul>"#
    )
}

/// One achievement listing page holding `ids`.
pub fn achievement_page(ids: &[u32], pages: usize) -> String {
    let entries: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li>
  <div class="ic_achievement"><img src="//img/achievement/{id}.png"></div>
  <p class="achievement_name">Achievement {id}</p>
  <p class="achievement_point">{points}</p>
  <span id="datetime-{id}">-</span>
  <script>document.getElementById('datetime-{id}').innerHTML = ldst_strftime({date}, 'YMD');</script>
  <a class="bt_more" href="/lodestone/character/{char_id}/achievement/detail/{id}/">More</a>
</li>"#,
                points = 5 + id % 3 * 5,
                date = 1_377_000_000 + id,
                char_id = CHARACTER_ID,
            )
        })
        .collect();

    format!(
        r#"<html><body><ul class="achievement_cnts">{entries}</ul>{pager}</body></html>"#,
        pager = pager(
            &format!("/lodestone/character/{}/achievement/kind/13/?filter=2", CHARACTER_ID),
            pages
        )
    )
}

pub fn fc_profile_page() -> String {
    r#"<html><body>
  <div class="ic_crest_64"><img src="//img/crest_l1.png"><img src="//img/crest_l2.png"><img src="//img/crest_l3.png"></div>
  <table class="table_style2">
    <tr><th>Free Company Name«Company Tag»</th><td class="vm"><span>Seventh Heaven</span><br>«7TH»</td></tr>
    <tr><th>Formed</th><td><span id="datetime-formed">-</span><script>document.getElementById('datetime-formed').innerHTML = ldst_strftime(1377345600, 'YMD');</script></td></tr>
    <tr><th>Active Members</th><td>112</td></tr>
    <tr><th>Company Slogan</th><td>Raids nightly.<br>All welcome!</td></tr>
    <tr><th>Rank</th><td>8</td></tr>
    <tr><th>Active</th><td>Always</td></tr>
    <tr><th>Recruitment</th><td>Open</td></tr>
    <tr><th>Estate Profile</th><td><div class="txt_yellow">Heaven's Gate</div><p>Plot 5, 3 Ward, Mist (Medium)</p><p>Welcome home!</p></td></tr>
  </table>
</body></html>"#
        .to_string()
}

/// Member listing page `page` of `pages`, with `count` members. Ids are
/// `page * 1000 + i`; the first member of page 1 is the master.
pub fn fc_member_page(page: usize, pages: usize, count: usize) -> String {
    let rows: String = (0..count)
        .map(|i| {
            let id = page * 1000 + i;
            let rank = if page == 1 && i == 0 { 0 } else { 1 + i % 7 };
            let rank_name = if rank == 0 { "Master" } else { "Member" };
            format!(
                r#"<div class="player_name_area">
  <div class="player_name_gold"><a href="/lodestone/character/{id}/">Member {id}</a></div>
  <img src="//img/fc/class/{rank}.png" width="16"><span class="fc_member_status">{rank_name}</span>
</div>"#
            )
        })
        .collect();

    format!(
        r#"<html><body>
  <div class="ic_freecompany_box"><span>Free Company</span><span>Seventh Heaven</span><span>({world})</span></div>
  <div class="crest_id">Immortal Flames <span class="friendship_color">&lt;Allied&gt;</span></div>
  {rows}
  {pager}
</body></html>"#,
        world = WORLD,
        pager = pager(&format!("/lodestone/freecompany/{}/member/", FC_ID), pages),
    )
}

pub fn removed_page() -> String {
    "<html><body><h2>The page you are searching for has either been removed, or the URL is incorrect.</h2></body></html>"
        .to_string()
}

pub fn topics_page() -> String {
    r#"<html><body><ul class="topics_list">
  <li>
    <div class="topics_list_inner"><a href="/lodestone/topics/detail/f8c0f5a0d2c7ea3ec4f2ff7c5e2c1b1a">Patch 2.1 Notes</a></div>
    <span id="datetime-0">-</span><script>document.getElementById('datetime-0').innerHTML = ldst_strftime(1386000000, 'YMD');</script>
    <div class="area_inner_cont"><p>Read <a href="/lodestone/news/detail/abc">the full notes</a>.</p></div>
  </li>
  <li>
    <div class="topics_list_inner"><a href="/lodestone/topics/detail/00aa">Maintenance</a></div>
    <script>ldst_strftime(1385000000, 'YMD');</script>
    <div class="area_inner_cont"><p>Downtime ahead.</p></div>
  </li>
</ul></body></html>"#
        .to_string()
}

pub fn search_page(entries: &[(&str, &str)]) -> String {
    let rows: String = entries
        .iter()
        .map(|(id, name)| {
            format!(
                r#"<div class="player_name_area"><div class="player_name_gold"><a href="/lodestone/character/{id}/">{name}</a></div></div>"#
            )
        })
        .collect();
    format!("<html><body>{rows}</body></html>")
}
