//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> String {
    r##"# Veil Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[content]
# mode = "packaged"        # packaged, dev_server
# dev_server_port = 4444
# app_root = "/opt/veil"   # defaults to the executable's directory
# build_dir = "build"

[pool]
# retention_floor = 2      # warm surfaces kept after dialogs close (>= 1)
# prewarm = 1              # blank surfaces created at startup
# max_surfaces = 8         # unset = grow on demand

[dialogs]
# persistent = ["search", "preview"]

[dialogs.menu]
# width = 330
# height = 470
# margin = 16
# margin_top = 3

[logging]
# level = "INFO"           # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
