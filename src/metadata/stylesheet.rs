/// Stylesheet stored next to the metadata document when previews are
/// written. It renders the header fields, the channel list and the preview
/// traces as HTML tables.
pub const STYLESHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xsl:stylesheet version="1.0" xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
<xsl:output method="html" doctype-system="about:legacy-compat" indent="yes"/>

<xsl:template match="/RS_IQ_TAR_FileFormat">
  <html>
    <head>
      <meta charset="UTF-8"/>
      <title>I/Q data: <xsl:value-of select="DataFilename"/></title>
      <style>
        body { font-family: sans-serif; font-size: 13px; }
        table { border-collapse: collapse; margin-bottom: 1em; }
        td, th { border: 1px solid #999; padding: 2px 8px; text-align: left; }
        th { background: #ddd; }
        .histogram { font-family: monospace; white-space: pre; line-height: 1; }
      </style>
    </head>
    <body>
      <h2><xsl:value-of select="DataFilename"/></h2>
      <table>
        <tr><th>Application</th><td><xsl:value-of select="Name"/></td></tr>
        <tr><th>Comment</th><td><xsl:value-of select="Comment"/></td></tr>
        <tr><th>Date</th><td><xsl:value-of select="DateTime"/></td></tr>
        <tr><th>Samples</th><td><xsl:value-of select="Samples"/></td></tr>
        <tr><th>Clock</th><td><xsl:value-of select="Clock"/> Hz</td></tr>
        <tr><th>Center frequency</th><td><xsl:value-of select="UserData/RohdeSchwarz/DataImportExport_MandatoryData/CenterFrequency"/> Hz</td></tr>
        <tr><th>Format</th><td><xsl:value-of select="Format"/></td></tr>
        <tr><th>Data type</th><td><xsl:value-of select="DataType"/></td></tr>
        <tr><th>Scaling factor</th><td><xsl:value-of select="ScalingFactor"/> V</td></tr>
        <tr><th>Channels</th><td><xsl:value-of select="NumberOfChannels"/></td></tr>
      </table>

      <xsl:if test="UserData/RohdeSchwarz/DataImportExport_OptionalData/Key">
        <h3>User data</h3>
        <table>
          <xsl:for-each select="UserData/RohdeSchwarz/DataImportExport_OptionalData/Key">
            <tr><th><xsl:value-of select="@name"/></th><td><xsl:value-of select="."/></td></tr>
          </xsl:for-each>
        </table>
      </xsl:if>

      <xsl:for-each select="PreviewData/ArrayOfChannel/Channel">
        <h3><xsl:value-of select="Name"/></h3>
        <table>
          <tr><th>Preview</th><th>Min [dB]</th><th>Max [dB]</th></tr>
          <tr>
            <td>Power vs time</td>
            <td><xsl:for-each select="PowerVsTime/Min/ArrayOfFloat/float"><xsl:value-of select="."/><xsl:text> </xsl:text></xsl:for-each></td>
            <td><xsl:for-each select="PowerVsTime/Max/ArrayOfFloat/float"><xsl:value-of select="."/><xsl:text> </xsl:text></xsl:for-each></td>
          </tr>
          <tr>
            <td>Spectrum</td>
            <td><xsl:for-each select="Spectrum/Min/ArrayOfFloat/float"><xsl:value-of select="."/><xsl:text> </xsl:text></xsl:for-each></td>
            <td><xsl:for-each select="Spectrum/Max/ArrayOfFloat/float"><xsl:value-of select="."/><xsl:text> </xsl:text></xsl:for-each></td>
          </tr>
        </table>
        <xsl:call-template name="histogram">
          <xsl:with-param name="digits" select="IQ/Histogram"/>
          <xsl:with-param name="width" select="IQ/Histogram/@width"/>
        </xsl:call-template>
      </xsl:for-each>
    </body>
  </html>
</xsl:template>

<xsl:template name="histogram">
  <xsl:param name="digits"/>
  <xsl:param name="width"/>
  <div class="histogram">
    <xsl:call-template name="rows">
      <xsl:with-param name="rest" select="normalize-space($digits)"/>
      <xsl:with-param name="width" select="$width"/>
    </xsl:call-template>
  </div>
</xsl:template>

<xsl:template name="rows">
  <xsl:param name="rest"/>
  <xsl:param name="width"/>
  <xsl:if test="string-length($rest) &gt; 0">
    <xsl:value-of select="translate(substring($rest, 1, $width), '0', '.')"/>
    <br/>
    <xsl:call-template name="rows">
      <xsl:with-param name="rest" select="substring($rest, $width + 1)"/>
      <xsl:with-param name="width" select="$width"/>
    </xsl:call-template>
  </xsl:if>
</xsl:template>

</xsl:stylesheet>
"#;
