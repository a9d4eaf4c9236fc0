//! Fixed companion configuration files emitted with every scene.

/// Engine options with the project name substituted in.
pub(crate) fn options_rpy(project_name: &str) -> String {
    format!(
        r#"## Engine options for this generated scene.

## Graphics

define config.screen_width = 1920
define config.screen_height = 1080

## The title of the game.
define config.name = _("{name}")

define config.version = "1.0"

## A short name used for executables and directories.
define build.name = "{name}"

## Sounds and music

define config.has_sound = True
define config.has_music = True
define config.has_voice = True

## Transitions

define config.enter_transition = dissolve
define config.exit_transition = dissolve
define config.intra_transition = dissolve
define config.after_load_transition = None
define config.end_game_transition = None

## Window management

define config.window = "auto"
define config.window_show_transition = Dissolve(.2)
define config.window_hide_transition = Dissolve(.2)

## Preference defaults

default preferences.text_cps = 30
default preferences.auto_forward_time = 15

## Save directory

define config.save_directory = "{name}"
"#,
        name = project_name
    )
}

/// Fixed GUI configuration.
pub(crate) fn gui_rpy() -> &'static str {
    r#"## GUI configuration for this generated scene.

## Colors

define gui.accent_color = '#0066cc'
define gui.idle_color = '#888888'
define gui.hover_color = '#66b3ff'
define gui.selected_color = '#ffffff'
define gui.insensitive_color = '#8888887f'

## Fonts

define gui.default_font = "DejaVuSans.ttf"
define gui.name_font = "DejaVuSans-Bold.ttf"
define gui.interface_font = "DejaVuSans.ttf"

## Text

define gui.text_size = 22
define gui.name_text_size = 30
define gui.interface_text_size = 22
"#
}
