/*Salida legible del fsck: una sección por paso (superblock, bitmaps,
duplicados) con una línea por corrección, y un resumen final.
Escribe sobre cualquier `Write` para que el binario sólo tenga que pasarle stdout. */

use std::io::{self, Write};

use colored::*;

use super::fsck_types::FsckReport;

fn plural<'a>(n: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if n == 1 {
        singular
    } else {
        plural
    }
}

pub fn write_report<W: Write>(out: &mut W, rep: &FsckReport) -> io::Result<()> {
    writeln!(out, "\n{}", " VSFS FILESYSTEM CHECK ".on_blue().bold())?;
    writeln!(out, "{}", "──────────────────────────────────────────".blue())?;

    // ——————————————————————————————————————————
    //       SUPERBLOCK
    // ——————————————————————————————————————————
    writeln!(out, "\n{}", "Superblock".bold().underline())?;

    if rep.superblock_ok() {
        writeln!(out, "  {} Superblock válido", "✓".green())?;
    } else {
        for fix in &rep.superblock {
            writeln!(out, "  {} {}", "•".yellow(), fix)?;
        }
        let n = rep.superblock.len();
        writeln!(
            out,
            "  {} Superblock corregido ({} {})",
            "✗".red(),
            n.to_string().yellow(),
            plural(n, "campo", "campos")
        )?;
    }

    // ——————————————————————————————————————————
    //       BITMAPS DE INODOS Y DATOS
    // ——————————————————————————————————————————
    writeln!(out, "\n{}", "Bitmaps de inodos y datos".bold().underline())?;

    if rep.bitmaps_ok() {
        writeln!(out, "  {} Sin errores en los bitmaps", "✓".green())?;
    } else {
        for fix in &rep.bitmaps {
            writeln!(out, "  {} {}", "•".yellow(), fix)?;
        }
    }

    // ——————————————————————————————————————————
    //       BLOQUES DUPLICADOS
    // ——————————————————————————————————————————
    writeln!(out, "\n{}", "Bloques duplicados".bold().underline())?;

    if rep.has_duplicates() {
        for dup in &rep.duplicates {
            writeln!(out, "  {} {}", "•".red(), dup.to_string().red())?;
        }
    } else {
        writeln!(out, "  {} No hay bloques duplicados", "✓".green())?;
    }

    // ——————————————————————————————————————————
    //       RESUMEN FINAL
    // ——————————————————————————————————————————
    writeln!(out, "\n{}", "Resumen".bold().underline())?;

    if rep.is_clean() {
        writeln!(out, "{} Sistema de archivos limpio.", "✓ OK".green().bold())?;
    }

    let fixes = rep.total_fixes();
    if fixes > 0 {
        writeln!(
            out,
            "{} {} {}.",
            "✓ Reparado:".yellow().bold(),
            fixes.to_string().yellow(),
            plural(fixes, "corrección aplicada", "correcciones aplicadas")
        )?;
    }

    // Los duplicados nunca se resuelven: se avisan aparte aunque no haya correcciones.
    let dups = rep.duplicates.len();
    if dups > 0 {
        writeln!(
            out,
            "{} {} {} sin resolver.",
            "✗".red().bold(),
            dups.to_string().red(),
            plural(dups, "bloque duplicado", "bloques duplicados")
        )?;
    }

    writeln!(out, "Cambios escritos. La imagen quedó consistente.\n")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fs::*;
    use crate::fsck::fsck::run_fsck;
    use crate::fsck::mock::MemBackend;
    use crate::mkfs::format_image;

    fn render(mem: &mut MemBackend) -> Vec<String> {
        colored::control::set_override(false);
        let rep = run_fsck(mem).unwrap();
        let mut out = Vec::new();
        write_report(&mut out, &rep).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn clean_image() -> MemBackend {
        let mut mem = MemBackend::zeroed();
        format_image(&mut mem).unwrap();
        mem
    }

    fn live_inode(direct_block: u32) -> InodeDisk {
        InodeDisk {
            link_count: 1,
            block_count: 1,
            direct_block,
            ..InodeDisk::empty()
        }
    }

    #[test]
    fn clean_image_log() {
        let lines = render(&mut clean_image());

        assert!(lines.contains(&"  ✓ Superblock válido".to_string()));
        assert!(lines.contains(&"  ✓ Sin errores en los bitmaps".to_string()));
        assert!(lines.contains(&"  ✓ No hay bloques duplicados".to_string()));
        assert!(lines.contains(&"✓ OK Sistema de archivos limpio.".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Reparado") || l.contains("sin resolver")));
        assert_eq!(
            lines.iter().rev().find(|l| !l.is_empty()).unwrap(),
            "Cambios escritos. La imagen quedó consistente."
        );
    }

    #[test]
    fn bad_magic_log() {
        let mut mem = clean_image();
        let mut sb = SuperblockDisk::canonical();
        sb.magic = 0xBEEF;
        mem.put_superblock(&sb);

        let lines = render(&mut mem);
        assert!(lines.contains(&"  • Corrigiendo magic: era 0xbeef".to_string()));
        assert!(lines.contains(&"  ✗ Superblock corregido (1 campo)".to_string()));
        assert!(lines.contains(&"  ✓ Sin errores en los bitmaps".to_string()));
        assert!(lines.contains(&"✓ Reparado: 1 corrección aplicada.".to_string()));
        assert!(!lines.iter().any(|l| l.contains("limpio")));
    }

    #[test]
    fn duplicates_only_log() {
        let mut mem = clean_image();
        mem.put_inode(1, &live_inode(10));
        mem.put_inode(2, &live_inode(10));
        mem.mark_inode(1);
        mem.mark_inode(2);
        mem.mark_data_block(10);

        let lines = render(&mut mem);
        assert!(lines.contains(&"  ✓ Superblock válido".to_string()));
        assert!(lines.contains(&"  ✓ Sin errores en los bitmaps".to_string()));
        assert!(lines
            .contains(&"  • Bloque de datos 10 referenciado por 2 inodos (duplicado)".to_string()));
        assert!(lines.contains(&"✗ 1 bloque duplicado sin resolver.".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Reparado") || l.contains("limpio")));
    }

    #[test]
    fn repaired_log_lists_every_fix() {
        let mut mem = clean_image();
        let mut sb = SuperblockDisk::canonical();
        sb.block_size = 1024;
        sb.inode_count = 5;
        mem.put_superblock(&sb);
        mem.put_inode(4, &live_inode(70));
        mem.mark_data_block(40);

        let lines = render(&mut mem);
        assert!(lines.contains(&"  • Corrigiendo block_size: era 1024".to_string()));
        assert!(lines.contains(&"  • Corrigiendo inode_count: era 5".to_string()));
        assert!(lines.contains(&"  ✗ Superblock corregido (2 campos)".to_string()));
        assert!(lines.contains(
            &"  • Inodo 4 válido no marcado en el bitmap de inodos, se marca".to_string()
        ));
        assert!(lines.contains(
            &"  • Inodo 4: bloque directo 70 fuera de rango, se pone a 0".to_string()
        ));
        assert!(lines.contains(
            &"  • Bloque de datos 40 marcado en el bitmap pero sin referencias, se libera"
                .to_string()
        ));
        assert!(lines.contains(&"✓ Reparado: 5 correcciones aplicadas.".to_string()));
    }
}
