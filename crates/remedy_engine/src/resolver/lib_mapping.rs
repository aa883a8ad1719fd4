//! C-library short names -> distro-family dev packages.
//!
//! Covers the `cannot find -lssl` class of failures: the linker speaks in
//! short library names, the package manager in per-family dev-package
//! names.

/// (library short name, [(distro family, dev package)]).
static LIB_PACKAGES: &[(&str, &[(&str, &str)])] = &[
    (
        "ssl",
        &[
            ("debian", "libssl-dev"),
            ("fedora", "openssl-devel"),
            ("arch", "openssl"),
            ("alpine", "openssl-dev"),
            ("suse", "libopenssl-devel"),
        ],
    ),
    (
        "crypto",
        &[
            ("debian", "libssl-dev"),
            ("fedora", "openssl-devel"),
            ("arch", "openssl"),
            ("alpine", "openssl-dev"),
            ("suse", "libopenssl-devel"),
        ],
    ),
    (
        "z",
        &[
            ("debian", "zlib1g-dev"),
            ("fedora", "zlib-devel"),
            ("arch", "zlib"),
            ("alpine", "zlib-dev"),
            ("suse", "zlib-devel"),
        ],
    ),
    (
        "ffi",
        &[
            ("debian", "libffi-dev"),
            ("fedora", "libffi-devel"),
            ("arch", "libffi"),
            ("alpine", "libffi-dev"),
            ("suse", "libffi-devel"),
        ],
    ),
    (
        "sqlite3",
        &[
            ("debian", "libsqlite3-dev"),
            ("fedora", "sqlite-devel"),
            ("arch", "sqlite"),
            ("alpine", "sqlite-dev"),
            ("suse", "sqlite3-devel"),
        ],
    ),
    (
        "xml2",
        &[
            ("debian", "libxml2-dev"),
            ("fedora", "libxml2-devel"),
            ("arch", "libxml2"),
            ("alpine", "libxml2-dev"),
            ("suse", "libxml2-devel"),
        ],
    ),
    (
        "curl",
        &[
            ("debian", "libcurl4-openssl-dev"),
            ("fedora", "libcurl-devel"),
            ("arch", "curl"),
            ("alpine", "curl-dev"),
            ("suse", "libcurl-devel"),
        ],
    ),
    (
        "pq",
        &[
            ("debian", "libpq-dev"),
            ("fedora", "libpq-devel"),
            ("arch", "postgresql-libs"),
            ("alpine", "libpq-dev"),
            ("suse", "postgresql-devel"),
        ],
    ),
    (
        "ncurses",
        &[
            ("debian", "libncurses-dev"),
            ("fedora", "ncurses-devel"),
            ("arch", "ncurses"),
            ("alpine", "ncurses-dev"),
            ("suse", "ncurses-devel"),
        ],
    ),
];

/// Dev package for library `lib` on distro family `family`.
pub fn lookup(lib: &str, family: &str) -> Option<&'static str> {
    LIB_PACKAGES
        .iter()
        .find(|(name, _)| *name == lib)
        .and_then(|(_, families)| {
            families
                .iter()
                .find(|(f, _)| *f == family)
                .map(|(_, pkg)| *pkg)
        })
}
