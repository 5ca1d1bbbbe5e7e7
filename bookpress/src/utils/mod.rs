pub mod assets;
pub mod markdown;
pub mod output;

pub use crate::utils::{
  assets::{FileKind, copy_book_files, copy_including_files},
  markdown::{
    ConversionReport,
    convert_file,
    convert_file_to,
    convert_markdown_files,
  },
  output::{
    HomePage,
    write_home_page,
    write_package_json,
    write_vitepress_config,
  },
};
