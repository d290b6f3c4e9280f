//! Known-symbol tables for the iBoot family.
//!
//! Immutable data distilled from prior analysis of these images. The fixed
//! offsets hold across every observed 64-bit build; the string patterns tie
//! diagnostic text each function is known to emit back to the function
//! itself.

use crate::model::SymbolKind;

/// A symbol whose location relative to the image base is known a priori.
#[derive(Debug, Clone, Copy)]
pub struct FixedOffsetSymbol {
    pub offset: u32,
    pub kind: SymbolKind,
    pub name: &'static str,
}

pub const KNOWN_FIXED_OFFSET_SYMBOLS: &[FixedOffsetSymbol] = &[
    FixedOffsetSymbol { offset: 0x0, kind: SymbolKind::Function, name: "_start" },
    FixedOffsetSymbol { offset: 0x200, kind: SymbolKind::Data, name: "build_banner_string" },
    FixedOffsetSymbol { offset: 0x240, kind: SymbolKind::Data, name: "build_style_string" },
    FixedOffsetSymbol { offset: 0x280, kind: SymbolKind::Data, name: "build_tag_string" },
];

/// A function identified indirectly via a diagnostic string it references.
///
/// `pattern` is matched as a plain substring of decoded string text, in
/// declaration order.
#[derive(Debug, Clone, Copy)]
pub struct StringAssociatedSymbol {
    pub name: &'static str,
    pub pattern: &'static str,
}

pub const KNOWN_STRING_ASSOCIATED_SYMBOLS: &[StringAssociatedSymbol] = &[
    StringAssociatedSymbol { name: "_panic", pattern: "double panic in" },
    StringAssociatedSymbol { name: "_platform_get_usb_serial_number_string", pattern: "CPID:" },
    StringAssociatedSymbol { name: "_platform_get_usb_more_other_string", pattern: " NONC:" },
    StringAssociatedSymbol { name: "_image4_get_partial", pattern: "IMG4" },
    StringAssociatedSymbol { name: "_UpdateDeviceTree", pattern: "fuse-revision" },
    StringAssociatedSymbol { name: "_main_task", pattern: "debug-uarts" },
    StringAssociatedSymbol { name: "_platform_init_display", pattern: "backlight-level" },
    StringAssociatedSymbol { name: "_do_printf", pattern: "<null>" },
    StringAssociatedSymbol { name: "_do_memboot", pattern: "Combo image too large" },
    StringAssociatedSymbol { name: "_do_go", pattern: "Memory image not valid" },
    StringAssociatedSymbol { name: "_task_init", pattern: "idle task" },
    StringAssociatedSymbol {
        name: "_sys_setup_default_environment",
        pattern: "/System/Library/Caches/com.apple.kernelcaches/kernelcache",
    },
    StringAssociatedSymbol {
        name: "_check_autoboot",
        pattern: "aborting autoboot due to user intervention",
    },
    StringAssociatedSymbol { name: "_do_setpict", pattern: "picture too large" },
    StringAssociatedSymbol { name: "_arm_exception_abort", pattern: "ARM %s abort at 0x%016llx:" },
    StringAssociatedSymbol { name: "_do_devicetree", pattern: "Device Tree image not valid" },
    StringAssociatedSymbol { name: "_do_ramdisk", pattern: "Ramdisk image not valid" },
    StringAssociatedSymbol { name: "_usb_serial_init", pattern: "Apple USB Serial Interface" },
    StringAssociatedSymbol {
        name: "_nvme_bdev_create",
        pattern: "construct blockdev for namespace %d",
    },
    StringAssociatedSymbol { name: "_image4_dump_list", pattern: "image %p: bdev %p type" },
    StringAssociatedSymbol { name: "_prepare_and_jump", pattern: "End of %s serial output" },
    StringAssociatedSymbol { name: "_boot_upgrade_system", pattern: "/boot/kernelcache" },
];
