mod add_file;
mod build_info;
mod pack;
mod show;
mod version;

pub use add_file::cmd_add_file;
pub use build_info::cmd_build_info;
pub use pack::cmd_pack;
pub use show::cmd_show;
pub use version::cmd_version;
