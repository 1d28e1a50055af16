use mapnotes::models::ActiveTab;
use mapnotes::shell::Shell;

#[test]
fn starts_on_map_tab_following_system() {
    let shell = Shell::new(true);
    assert_eq!(shell.active_tab(), ActiveTab::Map);
    assert!(shell.is_dark());
    assert!(!shell.has_override());
}

#[test]
fn manual_override_wins_over_system_changes() {
    let mut shell = Shell::new(false);

    shell.toggle_theme();
    assert!(shell.is_dark());
    assert!(shell.has_override());

    shell.set_system_dark(false);
    assert!(shell.is_dark());

    shell.toggle_theme();
    assert!(!shell.is_dark());
}

#[test]
fn selecting_a_tab_is_idempotent() {
    let mut shell = Shell::new(false);
    shell.select_tab(ActiveTab::Notes);
    shell.select_tab(ActiveTab::Notes);
    assert_eq!(shell.active_tab(), ActiveTab::Notes);
    shell.select_tab(ActiveTab::Map);
    assert_eq!(shell.active_tab(), ActiveTab::Map);
}
