//! User access permissions (the /P entry).
//!
//! PDF Spec: Section 7.6.3.2, Table 22 - User access permissions
//!
//! Bit positions below are 1-indexed from the least-significant bit, matching the
//! table in the PDF specification.

/// Reserved bits that are always set: 7-8 and 13-32.
///
/// Bits 1-2 must be zero; the feature bits 3-6 and 9-12 start cleared (denied).
pub const RESERVED_PERMISSION_BITS: i32 = 0xFFFFF0C0u32 as i32;

/// Bit 3: print the document.
pub const PRINT: i32 = 1 << 2;
/// Bit 4: modify the contents of the document.
pub const MODIFY: i32 = 1 << 3;
/// Bit 5: copy or otherwise extract text and graphics.
pub const COPY: i32 = 1 << 4;
/// Bit 6: add or modify annotations.
pub const ANNOTATE: i32 = 1 << 5;
/// Bit 9: fill in existing form fields.
pub const FILL_FORMS: i32 = 1 << 8;
/// Bit 10: extract text and graphics for accessibility.
pub const ACCESSIBILITY: i32 = 1 << 9;
/// Bit 11: assemble the document (insert, rotate, delete pages).
pub const ASSEMBLE: i32 = 1 << 10;
/// Bit 12: print at full (faithful) quality.
pub const PRINT_HIGH_QUALITY: i32 = 1 << 11;

/// How the document may be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintPermission {
    /// Printing is not allowed.
    #[default]
    None,
    /// Printing is allowed, possibly at degraded quality.
    LowResolution,
    /// Printing is allowed at full quality.
    HighResolution,
}

/// Permission policy applied when the document is opened with the user password.
///
/// The default grants nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    /// Printing level.
    pub printing: PrintPermission,
    /// Allow modifying the document contents.
    pub modifying: bool,
    /// Allow copying or extracting text and graphics.
    pub copying: bool,
    /// Allow adding annotations and comments.
    pub annotating: bool,
    /// Allow filling in form fields.
    pub filling_forms: bool,
    /// Allow extracting content for accessibility.
    pub content_accessibility: bool,
    /// Allow document assembly.
    pub document_assembly: bool,
}

impl Permissions {
    /// Create with all permissions granted.
    pub fn all() -> Self {
        Self {
            printing: PrintPermission::HighResolution,
            modifying: true,
            copying: true,
            annotating: true,
            filling_forms: true,
            content_accessibility: true,
            document_assembly: true,
        }
    }

    /// Set the printing level.
    pub fn with_printing(mut self, printing: PrintPermission) -> Self {
        self.printing = printing;
        self
    }

    /// Convert permissions to the signed 32-bit P value for the encryption dictionary.
    ///
    /// Starts from [`RESERVED_PERMISSION_BITS`] and ORs in each granted feature.
    pub fn to_bits(&self) -> i32 {
        let mut bits = RESERVED_PERMISSION_BITS;

        match self.printing {
            PrintPermission::None => {},
            PrintPermission::LowResolution => bits |= PRINT,
            PrintPermission::HighResolution => bits |= PRINT | PRINT_HIGH_QUALITY,
        }

        let flags = [
            (self.modifying, MODIFY),
            (self.copying, COPY),
            (self.annotating, ANNOTATE),
            (self.filling_forms, FILL_FORMS),
            (self.content_accessibility, ACCESSIBILITY),
            (self.document_assembly, ASSEMBLE),
        ];
        for (granted, bit) in flags {
            if granted {
                bits |= bit;
            }
        }

        bits
    }

    /// Decode a P value back into a permission policy.
    ///
    /// High-quality printing only counts when printing itself (bit 3) is granted.
    pub fn from_bits(bits: i32) -> Self {
        let has = |bit: i32| bits & bit != 0;

        let printing = match (has(PRINT), has(PRINT_HIGH_QUALITY)) {
            (true, true) => PrintPermission::HighResolution,
            (true, false) => PrintPermission::LowResolution,
            (false, _) => PrintPermission::None,
        };

        Self {
            printing,
            modifying: has(MODIFY),
            copying: has(COPY),
            annotating: has(ANNOTATE),
            filling_forms: has(FILL_FORMS),
            content_accessibility: has(ACCESSIBILITY),
            document_assembly: has(ASSEMBLE),
        }
    }

    /// Check if printing at any quality is allowed.
    pub fn can_print(&self) -> bool {
        self.printing != PrintPermission::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_baseline() {
        assert_eq!(RESERVED_PERMISSION_BITS, -3904);
        assert_eq!(Permissions::default().to_bits(), RESERVED_PERMISSION_BITS);
        // Value must be negative: the high bit is reserved and set
        assert!(Permissions::all().to_bits() < 0);
    }

    #[test]
    fn test_high_resolution_printing_only() {
        let perms = Permissions::default().with_printing(PrintPermission::HighResolution);
        let bits = perms.to_bits();

        assert_eq!(bits, -1852);
        assert!(bits & PRINT != 0);
        assert!(bits & PRINT_HIGH_QUALITY != 0);
        assert!(bits & MODIFY == 0);
        assert!(bits & COPY == 0);
    }

    #[test]
    fn test_low_resolution_printing() {
        let bits = Permissions::default()
            .with_printing(PrintPermission::LowResolution)
            .to_bits();

        assert!(bits & PRINT != 0);
        assert!(bits & PRINT_HIGH_QUALITY == 0);
    }

    #[test]
    fn test_all_permissions_bits() {
        let bits = Permissions::all().to_bits();

        assert!(bits & (1 << 2) != 0); // print
        assert!(bits & (1 << 3) != 0); // modify
        assert!(bits & (1 << 4) != 0); // copy
        assert!(bits & (1 << 5) != 0); // annotate
        assert!(bits & (1 << 8) != 0); // fill_forms
        assert!(bits & (1 << 9) != 0); // accessibility
        assert!(bits & (1 << 10) != 0); // assemble
        assert!(bits & (1 << 11) != 0); // print_high_quality
        assert_eq!(bits & 0b11, 0); // bits 1-2 always clear
    }

    #[test]
    fn test_from_bits_round_trip() {
        let perms = Permissions {
            printing: PrintPermission::LowResolution,
            modifying: false,
            copying: true,
            annotating: false,
            filling_forms: true,
            content_accessibility: true,
            document_assembly: false,
        };

        assert_eq!(Permissions::from_bits(perms.to_bits()), perms);
        assert_eq!(Permissions::from_bits(Permissions::all().to_bits()), Permissions::all());
    }

    #[test]
    fn test_high_quality_without_print_is_no_print() {
        let perms = Permissions::from_bits(RESERVED_PERMISSION_BITS | PRINT_HIGH_QUALITY);
        assert_eq!(perms.printing, PrintPermission::None);
        assert!(!perms.can_print());
    }
}
